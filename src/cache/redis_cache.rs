//! Redis-backed cache layer.
//!
//! Products live in hashes (`product:<id>` with `name` and `price` fields) and
//! the recency list in the `recent_products` list key.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;
use tracing::{debug, info, warn};

use crate::cache::CacheLayer;
use crate::error::{CatalogError, Result};
use crate::product::{product_key, ProductFields, RECENT_PRODUCTS_KEY};

const NAME_FIELD: &str = "name";
const PRICE_FIELD: &str = "price";

/// Cache layer backed by a Redis connection pool.
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    /// Creates a pool for `url` and checks it answers `PING`.
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Creating Redis connection pool for the cache layer...");

        let pool = Config::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| {
                CatalogError::CacheUnavailable(format!("Failed to create Redis pool: {}", e))
            })?;

        let cache = Self::with_pool(pool);
        cache.ping().await?;

        info!("Redis connection pool created successfully");
        Ok(cache)
    }

    /// Wraps an existing pool.
    pub fn with_pool(pool: Pool) -> Self {
        Self { pool }
    }

    /// Round-trips a `PING` to the server.
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.conn().await?;
        let _: String = redis::cmd("PING").query_async(&mut *conn).await?;
        Ok(())
    }

    async fn conn(&self) -> Result<deadpool_redis::Connection> {
        Ok(self.pool.get().await?)
    }
}

/// Turns a `HGETALL` reply into fields.
///
/// An empty reply is a miss. A hash missing a field, or holding a price that
/// does not parse, is also treated as a miss so the next fill overwrites it.
fn decode_fields(key: &str, mut hash: HashMap<String, String>) -> Option<ProductFields> {
    if hash.is_empty() {
        return None;
    }

    let name = hash.remove(NAME_FIELD);
    let price = hash.get(PRICE_FIELD).and_then(|p| p.parse::<i64>().ok());

    match (name, price) {
        (Some(name), Some(price)) => Some(ProductFields { name, price }),
        _ => {
            warn!("Ignoring malformed cache hash '{}'", key);
            None
        }
    }
}

/// Milliseconds for `PEXPIRE`, saturating instead of wrapping negative.
fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

/// `MULTI` / `HSET` / `PEXPIRE` / `EXEC`: the fields and the deadline land together.
fn set_product_pipeline(key: &str, fields: &ProductFields, ttl: Duration) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .cmd("HSET")
        .arg(key)
        .arg(NAME_FIELD)
        .arg(&fields.name)
        .arg(PRICE_FIELD)
        .arg(fields.price)
        .pexpire(key, ttl_millis(ttl));
    pipe
}

/// `LPUSH` then `LTRIM 0 capacity-1`; a zero bound clears the list instead.
fn push_recent_pipeline(id: u64, capacity: usize) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic();

    match isize::try_from(capacity) {
        Ok(0) => {
            pipe.del(RECENT_PRODUCTS_KEY);
        }
        Ok(bound) => {
            pipe.lpush(RECENT_PRODUCTS_KEY, id)
                .ltrim(RECENT_PRODUCTS_KEY, 0, bound - 1);
        }
        // Beyond isize::MAX nothing is ever trimmed
        Err(_) => {
            pipe.lpush(RECENT_PRODUCTS_KEY, id);
        }
    }
    pipe
}

#[async_trait]
impl CacheLayer for RedisCache {
    async fn get_product(&self, id: u64) -> Result<Option<ProductFields>> {
        let key = product_key(id);
        let mut conn = self.conn().await?;

        let hash: HashMap<String, String> = conn.hgetall(&key).await?;
        Ok(decode_fields(&key, hash))
    }

    async fn set_product(&self, id: u64, fields: &ProductFields, ttl: Duration) -> Result<()> {
        let key = product_key(id);
        let mut conn = self.conn().await?;

        let _: () = set_product_pipeline(&key, fields, ttl)
            .query_async(&mut *conn)
            .await?;

        debug!("Cached '{}' with TTL {}ms", key, ttl.as_millis());
        Ok(())
    }

    async fn delete_product(&self, id: u64) -> Result<bool> {
        let key = product_key(id);
        let mut conn = self.conn().await?;

        let deleted: i64 = conn.del(&key).await?;
        Ok(deleted > 0)
    }

    async fn push_recent(&self, id: u64, capacity: usize) -> Result<()> {
        let mut conn = self.conn().await?;

        let _: () = push_recent_pipeline(id, capacity)
            .query_async(&mut *conn)
            .await?;
        Ok(())
    }

    async fn recent_ids(&self) -> Result<Vec<u64>> {
        let mut conn = self.conn().await?;
        let ids: Vec<u64> = conn.lrange(RECENT_PRODUCTS_KEY, 0, -1).await?;
        Ok(ids)
    }
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache").finish_non_exhaustive()
    }
}
