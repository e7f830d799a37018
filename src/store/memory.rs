//! In-memory product store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CatalogError, Result};
use crate::product::Product;
use crate::store::ProductStore;

/// HashMap-backed store for tests and local runs without a database.
///
/// A single write lock covers each update, which gives the same
/// all-or-nothing visibility as a SQL transaction.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<HashMap<u64, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `products`.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: RwLock::new(products.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn get(&self, id: u64) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn save(&self, product: &Product) -> Result<()> {
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        Ok(self.products.write().await.remove(&id).is_some())
    }

    async fn update_in_transaction(&self, id: u64, name: &str, price: i64) -> Result<()> {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        product.name = name.to_string();
        product.price = price;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_get() {
        let store = InMemoryProductStore::new();

        store.save(&Product::new(1, "Widget", 500)).await.unwrap();

        assert_eq!(
            store.get(1).await.unwrap(),
            Some(Product::new(1, "Widget", 500))
        );
        assert_eq!(store.get(2).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_replaces() {
        let store = InMemoryProductStore::with_products([Product::new(1, "Widget", 500)]);

        store.save(&Product::new(1, "Gadget", 900)).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(1).await.unwrap().unwrap().name, "Gadget");
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryProductStore::with_products([Product::new(1, "Widget", 500)]);

        assert!(store.delete(1).await.unwrap());
        assert!(!store.delete(1).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryProductStore::new();

        let result = store.update_in_transaction(5, "Ghost", 1).await;
        assert!(matches!(result, Err(CatalogError::NotFound(5))));
        assert!(store.is_empty().await);
    }
}
