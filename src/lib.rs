//! Catalog Cache - a product catalog service
//!
//! Keeps a TTL cache coherent with a durable SQL store using cache-aside reads,
//! write-through writes, manual and event-based invalidation, and
//! transactional updates.

pub mod api;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod models;
pub mod product;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use coordinator::{CatalogCoordinator, TtlPolicy};
pub use error::{CatalogError, Result};
pub use product::{Product, ProductFields};
pub use tasks::spawn_cleanup_task;
