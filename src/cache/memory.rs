//! Memory Cache Module
//!
//! In-process cache layer: a HashMap of TTL-bounded product entries plus the recency list.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheEntry, CacheLayer, RecencyList};
use crate::error::Result;
use crate::product::{product_key, ProductFields};

#[derive(Debug, Default)]
struct MemoryState {
    /// Product entries keyed by `product:<id>`
    entries: HashMap<String, CacheEntry>,
    /// Recently viewed product ids
    recent: RecencyList,
}

// == Memory Cache ==
/// Cache layer kept in process memory.
///
/// Expired entries read as absent and are dropped on access; the cleanup task
/// reclaims the ones nobody reads again.
#[derive(Debug, Default)]
pub struct MemoryCache {
    state: RwLock<MemoryState>,
}

impl MemoryCache {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut state = self.state.write().await;
        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired());
        before - state.entries.len()
    }

    // == Inspection ==
    /// Returns the raw entry for a product, including an expired one not yet reclaimed.
    pub async fn entry(&self, id: u64) -> Option<CacheEntry> {
        self.state.read().await.entries.get(&product_key(id)).cloned()
    }

    /// Returns the current number of stored entries.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}

#[async_trait]
impl CacheLayer for MemoryCache {
    async fn get_product(&self, id: u64) -> Result<Option<ProductFields>> {
        let key = product_key(id);
        let mut state = self.state.write().await;

        let Some(entry) = state.entries.get(&key) else {
            return Ok(None);
        };
        if !entry.is_expired() {
            return Ok(Some(entry.fields.clone()));
        }

        state.entries.remove(&key);
        debug!("Cache entry '{}' expired", key);
        Ok(None)
    }

    async fn set_product(&self, id: u64, fields: &ProductFields, ttl: Duration) -> Result<()> {
        let key = product_key(id);
        let entry = CacheEntry::new(fields.clone(), ttl);

        self.state.write().await.entries.insert(key, entry);
        Ok(())
    }

    async fn delete_product(&self, id: u64) -> Result<bool> {
        let removed = self
            .state
            .write()
            .await
            .entries
            .remove(&product_key(id))
            .is_some();
        Ok(removed)
    }

    async fn push_recent(&self, id: u64, capacity: usize) -> Result<()> {
        self.state.write().await.recent.push(id, capacity);
        Ok(())
    }

    async fn recent_ids(&self) -> Result<Vec<u64>> {
        Ok(self.state.read().await.recent.ids())
    }
}
