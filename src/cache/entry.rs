//! Cache Entry Module
//!
//! Defines a cached product copy together with its expiration deadline.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::product::ProductFields;

// == Cache Entry ==
/// A denormalized `{name, price}` copy of a product plus its TTL deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached fields
    pub fields: ProductFields,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl` from now.
    pub fn new(fields: ProductFields, ttl: Duration) -> Self {
        let now = current_timestamp_ms();
        Self {
            fields,
            created_at: now,
            expires_at: now.saturating_add(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches the deadline, so an
    /// entry whose TTL has fully elapsed is never served.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, `0` once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }

    /// Returns remaining TTL as a `Duration`.
    pub fn ttl_remaining(&self) -> Duration {
        Duration::from_millis(self.ttl_remaining_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn widget() -> ProductFields {
        ProductFields::new("Widget", 500)
    }

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(widget(), Duration::from_secs(60));

        assert_eq!(entry.fields, widget());
        assert_eq!(entry.expires_at, entry.created_at + 60_000);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(widget(), Duration::from_millis(50));

        assert!(!entry.is_expired());

        // Wait for expiration
        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new(widget(), Duration::from_secs(10));

        let remaining_ms = entry.ttl_remaining_ms();
        assert!(remaining_ms <= 10_000);
        assert!(remaining_ms >= 9_000);
        assert!(entry.ttl_remaining() <= Duration::from_secs(10));
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let entry = CacheEntry::new(widget(), Duration::from_millis(20));

        sleep(Duration::from_millis(50));

        assert_eq!(entry.ttl_remaining_ms(), 0);
        assert_eq!(entry.ttl_remaining(), Duration::ZERO);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            fields: widget(),
            created_at: now,
            expires_at: now, // Expires exactly at creation time
        };

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }

    #[test]
    fn test_huge_ttl_saturates_instead_of_wrapping() {
        let entry = CacheEntry::new(widget(), Duration::MAX);

        assert_eq!(entry.expires_at, u64::MAX);
        assert!(!entry.is_expired());
    }
}
