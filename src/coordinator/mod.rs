//! Consistency Coordinator
//!
//! Orders every operation across the durable store and the cache layer.
//!
//! The store is always written first. A store failure aborts before the cache
//! is touched; a cache failure after a committed store write is reported as
//! [`CatalogError::CacheAfterCommit`] and left for the next lookup to repair.
//!
//! Same-id writers are not serialized here. Two concurrent writes to one
//! product may commit in one order and reach the cache in the other, leaving
//! the cache holding the older value until its TTL runs out.

mod stats;


use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::CacheLayer;
use crate::error::{CatalogError, Result};
use crate::product::{Product, ProductFields};
use crate::store::ProductStore;

pub use stats::{CoordinatorStats, StatsSnapshot};

/// Default TTL for cache-aside fills and write-through writes (5 minutes).
pub const DEFAULT_ASIDE_TTL: Duration = Duration::from_secs(300);

/// Default TTL for transactional updates (1 minute).
pub const DEFAULT_TRANSACTIONAL_TTL: Duration = Duration::from_secs(60);

/// Default bound of the recently viewed list.
pub const DEFAULT_RECENT_CAPACITY: usize = 10;

// == TTL Policy ==
/// Expiration applied to each kind of cache population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    /// Fill-on-miss and write-through
    pub aside: Duration,
    /// Transactional update
    pub transactional: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            aside: DEFAULT_ASIDE_TTL,
            transactional: DEFAULT_TRANSACTIONAL_TTL,
        }
    }
}

// == Catalog Coordinator ==
/// Runs the caching strategies over an injected store and cache.
pub struct CatalogCoordinator {
    store: Arc<dyn ProductStore>,
    cache: Arc<dyn CacheLayer>,
    ttl: TtlPolicy,
    recent_capacity: usize,
    stats: CoordinatorStats,
}

impl CatalogCoordinator {
    /// Creates a coordinator with the default TTLs and recency bound.
    pub fn new(store: Arc<dyn ProductStore>, cache: Arc<dyn CacheLayer>) -> Self {
        Self::with_policy(store, cache, TtlPolicy::default(), DEFAULT_RECENT_CAPACITY)
    }

    pub fn with_policy(
        store: Arc<dyn ProductStore>,
        cache: Arc<dyn CacheLayer>,
        ttl: TtlPolicy,
        recent_capacity: usize,
    ) -> Self {
        Self {
            store,
            cache,
            ttl,
            recent_capacity,
            stats: CoordinatorStats::new(),
        }
    }

    pub fn ttl_policy(&self) -> TtlPolicy {
        self.ttl
    }

    pub fn recent_capacity(&self) -> usize {
        self.recent_capacity
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Checks the durable store answers queries.
    pub async fn store_health(&self) -> Result<()> {
        self.store.health_check().await
    }

    // == Lookup ==
    /// Cache-aside read.
    ///
    /// A hit is returned as is. On a miss the store is read and, if it has the
    /// product, the cache is filled with the aside TTL. An unreachable cache
    /// degrades to a store read; a failed fill is logged and the stored value
    /// is still returned. Does not touch the recency list.
    pub async fn lookup(&self, id: u64) -> Result<Product> {
        match self.cache.get_product(id).await {
            Ok(Some(fields)) => {
                self.stats.record_hit();
                debug!("Cache hit for product {}", id);
                return Ok(fields.into_product(id));
            }
            Ok(None) => {
                self.stats.record_miss();
                debug!("Cache miss for product {}", id);
            }
            Err(e) => {
                self.stats.record_degraded_read();
                warn!("Cache read for product {} failed, reading store: {}", id, e);
            }
        }

        let product = self
            .store
            .get(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        match self
            .cache
            .set_product(id, &product.fields(), self.ttl.aside)
            .await
        {
            Ok(()) => {
                self.stats.record_fill();
                debug!("Filled cache for product {}", id);
            }
            Err(e) => warn!("Cache fill for product {} failed: {}", id, e),
        }

        Ok(product)
    }

    // == Record Recent Access ==
    /// Pushes `id` onto the recency list, dropping the oldest past the bound.
    ///
    /// Never fails the caller; a cache error is logged and dropped.
    pub async fn record_recent_access(&self, id: u64) {
        if let Err(e) = self.cache.push_recent(id, self.recent_capacity).await {
            warn!("Failed to record recent access of product {}: {}", id, e);
        }
    }

    // == Create Or Update ==
    /// Write-through: saves to the store, then overwrites the cache entry.
    pub async fn create_or_update(
        &self,
        id: u64,
        name: impl Into<String>,
        price: i64,
    ) -> Result<Product> {
        let product = Product::new(id, name, price);

        self.store.save(&product).await?;
        self.stats.record_write();
        info!("Saved product {}", id);

        self.refresh_after_commit(id, &product.fields(), self.ttl.aside)
            .await?;
        Ok(product)
    }

    // == Invalidate ==
    /// Drops the cache entry for `id`; the store is untouched.
    ///
    /// Succeeds whether or not an entry existed and returns which it was.
    pub async fn invalidate(&self, id: u64) -> Result<bool> {
        let existed = self.cache.delete_product(id).await?;
        self.stats.record_invalidation();
        debug!("Invalidated product {} (cached: {})", id, existed);
        Ok(existed)
    }

    // == Delete Event Based ==
    /// Deletes from the store, then invalidates the cache entry.
    ///
    /// Deleting an id with no row still invalidates. Returns whether the
    /// store held a row.
    pub async fn delete_event_based(&self, id: u64) -> Result<bool> {
        let existed = self.store.delete(id).await?;
        self.stats.record_write();
        info!("Deleted product {} (existed: {})", id, existed);

        if let Err(e) = self.invalidate(id).await {
            return Err(self.cache_after_commit(id, e));
        }
        Ok(existed)
    }

    // == Update Transactional ==
    /// Commits name and price in one store transaction, then overwrites the
    /// cache entry with the transactional TTL.
    ///
    /// Nothing in the cache changes when the store rejects the update.
    pub async fn update_transactional(
        &self,
        id: u64,
        name: impl Into<String>,
        price: i64,
    ) -> Result<Product> {
        let fields = ProductFields::new(name, price);

        self.store
            .update_in_transaction(id, &fields.name, fields.price)
            .await?;
        self.stats.record_write();
        info!("Committed transactional update of product {}", id);

        self.refresh_after_commit(id, &fields, self.ttl.transactional)
            .await?;
        Ok(fields.into_product(id))
    }

    // == Recent Products ==
    /// Looks up every id on the recency list, in list order.
    ///
    /// Ids whose lookup fails (e.g. deleted since they were viewed) are
    /// skipped. Repeated ids yield repeated products.
    pub async fn recent_products(&self) -> Result<Vec<Product>> {
        let ids = self.cache.recent_ids().await?;
        let mut products = Vec::with_capacity(ids.len());

        for id in ids {
            match self.lookup(id).await {
                Ok(product) => products.push(product),
                Err(e) => debug!("Skipping recent product {}: {}", id, e),
            }
        }

        Ok(products)
    }

    async fn refresh_after_commit(
        &self,
        id: u64,
        fields: &ProductFields,
        ttl: Duration,
    ) -> Result<()> {
        self.cache
            .set_product(id, fields, ttl)
            .await
            .map_err(|e| self.cache_after_commit(id, e))
    }

    fn cache_after_commit(&self, id: u64, err: CatalogError) -> CatalogError {
        self.stats.record_cache_write_failure();
        warn!("Store committed product {} but the cache was not updated: {}", id, err);
        CatalogError::CacheAfterCommit {
            id,
            reason: err.to_string(),
        }
    }
}

impl std::fmt::Debug for CatalogCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCoordinator")
            .field("ttl", &self.ttl)
            .field("recent_capacity", &self.recent_capacity)
            .finish_non_exhaustive()
    }
}
