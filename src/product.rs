//! Product Module
//!
//! Domain types for catalog products and the cache key layout used to store them.

use serde::{Deserialize, Serialize};

// == Key Layout ==
/// Prefix for per-product cache entries (`product:<id>`)
pub const PRODUCT_KEY_PREFIX: &str = "product:";

/// Key of the bounded recency list
pub const RECENT_PRODUCTS_KEY: &str = "recent_products";

/// Returns the cache key for a product id.
pub fn product_key(id: u64) -> String {
    format!("{}{}", PRODUCT_KEY_PREFIX, id)
}

// == Product ==
/// A catalog product as persisted in the durable store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: u64,
    /// Display name
    pub name: String,
    /// Price in the smallest currency unit
    pub price: i64,
}

impl Product {
    pub fn new(id: u64, name: impl Into<String>, price: i64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }

    /// Splits the product into its cacheable fields.
    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.clone(),
            price: self.price,
        }
    }
}

// == Product Fields ==
/// The flattened `{name, price}` pair held by a cache entry.
///
/// The id lives in the cache key, never in the value, so a cached copy cannot
/// disagree with the key it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub price: i64,
}

impl ProductFields {
    pub fn new(name: impl Into<String>, price: i64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Rebuilds a full product from the fields and the id taken from the key.
    pub fn into_product(self, id: u64) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
        }
    }
}
