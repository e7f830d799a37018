//! Durable Store Module
//!
//! The authoritative product persistence. The coordinator holds it through the
//! [`ProductStore`] trait so a SQL store and an in-memory double are interchangeable.

mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::error::Result;
use crate::product::Product;

pub use memory::InMemoryProductStore;
pub use sqlite::SqliteProductStore;

/// Product persistence capabilities.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Finds a product by id.
    async fn get(&self, id: u64) -> Result<Option<Product>>;

    /// Creates the product or replaces every field of an existing one.
    async fn save(&self, product: &Product) -> Result<()>;

    /// Deletes a product. Returns true if a row existed.
    async fn delete(&self, id: u64) -> Result<bool>;

    /// Updates name and price inside a single transaction.
    ///
    /// Either both fields are committed or nothing is; an id with no row
    /// fails with `CatalogError::NotFound` after rolling back.
    async fn update_in_transaction(&self, id: u64, name: &str, price: i64) -> Result<()>;

    /// Checks the store can serve queries. Stores with no connection are always healthy.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
