//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Largest accepted cache TTL in seconds (30 days).
pub const MAX_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Which cache layer implementation the service runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// In-process cache, lost on restart
    Memory,
    /// Shared Redis instance
    Redis,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "redis" => Ok(CacheBackend::Redis),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// sqlx connection string for the durable store
    pub database_url: String,
    /// Maximum pooled store connections
    pub db_max_connections: u32,
    /// Deadline in seconds for establishing a store connection
    pub db_connect_timeout: u64,
    /// Cache layer implementation
    pub cache_backend: CacheBackend,
    /// Redis connection string, used when `cache_backend` is `Redis`
    pub redis_url: String,
    /// TTL in seconds for cache-aside fills and write-through writes
    pub aside_ttl: u64,
    /// TTL in seconds for transactional updates
    pub transactional_ttl: u64,
    /// Bound of the recently viewed products list
    pub recent_capacity: usize,
    /// Expired-entry sweep interval in seconds (memory backend)
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `DATABASE_URL` - Store connection string (default: `sqlite://catalog.db?mode=rwc`)
    /// - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
    /// - `DB_CONNECT_TIMEOUT` - Connect deadline in seconds (default: 5)
    /// - `CACHE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `REDIS_URL` - Redis connection string (default: `redis://127.0.0.1:6379`)
    /// - `ASIDE_TTL` - Fill / write-through TTL in seconds (default: 300)
    /// - `TRANSACTIONAL_TTL` - Transactional update TTL in seconds (default: 60)
    /// - `RECENT_CAPACITY` - Recently viewed list bound (default: 10)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 1)
    ///
    /// Zero TTLs and a zero sweep interval fall back to their defaults. TTLs
    /// above [`MAX_TTL_SECS`] are capped.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let seconds = |name: &str| parse_value::<u64>(lookup(name)).filter(|v| *v > 0);

        Self {
            server_port: parse_value(lookup("SERVER_PORT")).unwrap_or(defaults.server_port),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: parse_value(lookup("DB_MAX_CONNECTIONS"))
                .unwrap_or(defaults.db_max_connections),
            db_connect_timeout: parse_value(lookup("DB_CONNECT_TIMEOUT"))
                .unwrap_or(defaults.db_connect_timeout),
            cache_backend: parse_value(lookup("CACHE_BACKEND")).unwrap_or(defaults.cache_backend),
            redis_url: lookup("REDIS_URL").unwrap_or(defaults.redis_url),
            aside_ttl: seconds("ASIDE_TTL")
                .map(|ttl| ttl.min(MAX_TTL_SECS))
                .unwrap_or(defaults.aside_ttl),
            transactional_ttl: seconds("TRANSACTIONAL_TTL")
                .map(|ttl| ttl.min(MAX_TTL_SECS))
                .unwrap_or(defaults.transactional_ttl),
            recent_capacity: parse_value(lookup("RECENT_CAPACITY"))
                .unwrap_or(defaults.recent_capacity),
            cleanup_interval: seconds("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }
}

fn parse_value<T: FromStr>(raw: Option<String>) -> Option<T> {
    raw.and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            database_url: "sqlite://catalog.db?mode=rwc".to_string(),
            db_max_connections: 5,
            db_connect_timeout: 5,
            cache_backend: CacheBackend::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            aside_ttl: 300,
            transactional_ttl: 60,
            recent_capacity: 10,
            cleanup_interval: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.db_connect_timeout, 5);
        assert_eq!(config.cache_backend, CacheBackend::Memory);
        assert_eq!(config.aside_ttl, 300);
        assert_eq!(config.transactional_ttl, 60);
        assert_eq!(config.recent_capacity, 10);
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_from_empty_lookup_uses_defaults() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.database_url, "sqlite://catalog.db?mode=rwc");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.cache_backend, CacheBackend::Memory);
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.recent_capacity, 10);
        assert_eq!(config.cleanup_interval, 1);
    }

    #[test]
    fn test_config_from_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_PORT", "9000"),
            ("CACHE_BACKEND", "redis"),
            ("ASIDE_TTL", "120"),
            ("TRANSACTIONAL_TTL", "30"),
            ("CLEANUP_INTERVAL", "5"),
        ]));
        assert_eq!(config.server_port, 9000);
        assert_eq!(config.cache_backend, CacheBackend::Redis);
        assert_eq!(config.aside_ttl, 120);
        assert_eq!(config.transactional_ttl, 30);
        assert_eq!(config.cleanup_interval, 5);
    }

    #[test]
    fn test_zero_cleanup_interval_falls_back_to_default() {
        let config = Config::from_lookup(lookup_from(&[("CLEANUP_INTERVAL", "0")]));
        assert_eq!(config.cleanup_interval, 1);
    }

    #[test]
    fn test_zero_ttls_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("ASIDE_TTL", "0"),
            ("TRANSACTIONAL_TTL", "0"),
        ]));
        assert_eq!(config.aside_ttl, 300);
        assert_eq!(config.transactional_ttl, 60);
    }

    #[test]
    fn test_huge_ttls_are_capped() {
        let config = Config::from_lookup(lookup_from(&[
            ("ASIDE_TTL", "18446744073709551615"),
            ("TRANSACTIONAL_TTL", "99999999999"),
        ]));
        assert_eq!(config.aside_ttl, MAX_TTL_SECS);
        assert_eq!(config.transactional_ttl, MAX_TTL_SECS);
    }

    #[test]
    fn test_unparsable_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_PORT", "eighty"),
            ("CACHE_BACKEND", "memcached"),
        ]));
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cache_backend, CacheBackend::Memory);
    }

    #[test]
    fn test_cache_backend_parse() {
        assert_eq!("memory".parse::<CacheBackend>(), Ok(CacheBackend::Memory));
        assert_eq!(" Redis ".parse::<CacheBackend>(), Ok(CacheBackend::Redis));
        assert!("memcached".parse::<CacheBackend>().is_err());
    }
}
