//! SQL product store built on sqlx and SQLite.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};
use crate::product::Product;
use crate::store::ProductStore;

const CREATE_PRODUCTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS products (
    id    INTEGER PRIMARY KEY,
    name  TEXT    NOT NULL,
    price INTEGER NOT NULL
)";

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = CatalogError;

    fn try_from(row: ProductRow) -> Result<Self> {
        let id = u64::try_from(row.id)
            .map_err(|_| CatalogError::Store(format!("Stored product id {} is negative", row.id)))?;
        Ok(Product {
            id,
            name: row.name,
            price: row.price,
        })
    }
}

/// SQLite columns are signed; ids above `i64::MAX` cannot be stored.
fn db_id(id: u64) -> Result<i64> {
    i64::try_from(id)
        .map_err(|_| CatalogError::InvalidRequest(format!("Product id {} is out of range", id)))
}

/// Durable store over a pooled SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteProductStore {
    pool: SqlitePool,
}

impl SqliteProductStore {
    /// Opens a pool and makes sure the schema exists.
    ///
    /// `connect_timeout` bounds how long acquiring a connection may take,
    /// including the first one opened here.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self> {
        info!("Connecting to product database...");

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(connect_timeout)
            .connect(url)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                CatalogError::Store(format!("Failed to connect: {}", e))
            })?;

        let store = Self::with_pool(pool);
        store.run_migrations().await?;

        info!("Product database connection pool established");
        Ok(store)
    }

    /// Wraps a pre-existing pool.
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the products table if it is missing.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::query(CREATE_PRODUCTS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| CatalogError::Store(format!("Migration failed: {}", e)))?;
        Ok(())
    }

    /// Closes the pool.
    pub async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
    }
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    async fn get(&self, id: u64) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price FROM products WHERE id = ?",
        )
        .bind(db_id(id)?)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn save(&self, product: &Product) -> Result<()> {
        sqlx::query(
            "INSERT INTO products (id, name, price) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, price = excluded.price",
        )
        .bind(db_id(product.id)?)
        .bind(&product.name)
        .bind(product.price)
        .execute(&self.pool)
        .await?;

        debug!("Saved product {}", product.id);
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(db_id(id)?)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_in_transaction(&self, id: u64, name: &str, price: i64) -> Result<()> {
        let db_id = db_id(id)?;
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE products SET name = ?, price = ? WHERE id = ?")
            .bind(name)
            .bind(price)
            .bind(db_id)
            .execute(&mut *tx)
            .await;

        let rows = match updated {
            Ok(result) => result.rows_affected(),
            Err(e) => {
                tx.rollback().await?;
                return Err(e.into());
            }
        };

        if rows == 0 {
            tx.rollback().await?;
            return Err(CatalogError::NotFound(id));
        }

        tx.commit().await?;
        debug!("Committed transactional update of product {}", id);
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| CatalogError::Store(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One connection: every `sqlite::memory:` connection is its own database
    async fn memory_store() -> SqliteProductStore {
        SqliteProductStore::connect("sqlite::memory:", 1, Duration::from_secs(5))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_connect_runs_migrations() {
        let store = memory_store().await;
        store.health_check().await.unwrap();
        assert_eq!(store.get(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_is_upsert() {
        let store = memory_store().await;

        store.save(&Product::new(1, "Widget", 500)).await.unwrap();
        store.save(&Product::new(1, "Widget", 650)).await.unwrap();

        assert_eq!(
            store.get(1).await.unwrap(),
            Some(Product::new(1, "Widget", 650))
        );
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = memory_store().await;
        store.save(&Product::new(3, "Bolt", 5)).await.unwrap();

        assert!(store.delete(3).await.unwrap());
        assert!(!store.delete(3).await.unwrap());
        assert_eq!(store.get(3).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_transactional_update_commits_both_fields() {
        let store = memory_store().await;
        store.save(&Product::new(1, "Widget", 500)).await.unwrap();

        store.update_in_transaction(1, "Widget Pro", 600).await.unwrap();

        assert_eq!(
            store.get(1).await.unwrap(),
            Some(Product::new(1, "Widget Pro", 600))
        );
    }

    #[tokio::test]
    async fn test_transactional_update_of_missing_row_rolls_back() {
        let store = memory_store().await;

        let result = store.update_in_transaction(42, "Ghost", 1).await;
        assert!(matches!(result, Err(CatalogError::NotFound(42))));

        // The pool's single connection was released by the rollback
        store.health_check().await.unwrap();
        assert_eq!(store.get(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_health_check_fails_once_pool_is_closed() {
        let store = memory_store().await;
        store.health_check().await.unwrap();

        store.close().await;

        assert!(matches!(
            store.health_check().await,
            Err(CatalogError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_id_is_rejected() {
        let store = memory_store().await;

        let result = store.get(u64::MAX).await;
        assert!(matches!(result, Err(CatalogError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_connect_failure_is_store_error() {
        let result = SqliteProductStore::connect(
            "sqlite:///nonexistent-dir/catalog.db",
            1,
            Duration::from_secs(1),
        )
        .await;
        assert!(matches!(result, Err(CatalogError::Store(_))));
    }
}
