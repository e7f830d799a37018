//! Cache Module
//!
//! The passive key-value side store holding product copies and the recency list.
//! It never decides when to populate or invalidate; the coordinator does.

mod entry;
mod memory;
mod recent;
mod redis_cache;


use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::product::ProductFields;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use recent::RecencyList;
pub use redis_cache::RedisCache;

// == Cache Layer ==
/// Capabilities the coordinator needs from a cache.
///
/// A missing or expired entry is `Ok(None)`; connectivity problems are
/// `Err(CatalogError::CacheUnavailable)`, so a caller can tell a miss that
/// warrants a fill apart from an outage.
#[async_trait]
pub trait CacheLayer: Send + Sync {
    /// Reads the cached fields for a product.
    async fn get_product(&self, id: u64) -> Result<Option<ProductFields>>;

    /// Overwrites the cached fields and resets the TTL, as one unit.
    async fn set_product(&self, id: u64, fields: &ProductFields, ttl: Duration) -> Result<()>;

    /// Removes the cached entry. Returns true if one existed.
    async fn delete_product(&self, id: u64) -> Result<bool>;

    /// Pushes an id onto the recency list and trims it to `capacity`.
    async fn push_recent(&self, id: u64, capacity: usize) -> Result<()>;

    /// Returns the whole recency list, most recent first.
    async fn recent_ids(&self) -> Result<Vec<u64>>;
}
