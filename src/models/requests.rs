//! Request DTOs for the catalog API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Maximum accepted product name length in characters
pub const MAX_NAME_LENGTH: usize = 256;

fn validate_name(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        return Some("Name cannot be empty".to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Some(format!(
            "Name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        ));
    }
    None
}

/// Request body for create-or-update (POST /v1/products/)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    /// Product id chosen by the caller
    pub id: u64,
    pub name: String,
    pub price: i64,
}

impl CreateProductRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_name(&self.name)
    }
}

/// Request body for the transactional update (PUT /v1/products/:id)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub price: i64,
}

impl UpdateProductRequest {
    /// Validates the request data
    pub fn validate(&self) -> Option<String> {
        validate_name(&self.name)
    }
}
