//! Error types for the catalog service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Catalog Error Enum ==
/// Unified error type for the catalog service.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The durable store has no record for the id
    #[error("Product not found: {0}")]
    NotFound(u64),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Durable store connectivity or constraint failure
    #[error("Store failure: {0}")]
    Store(String),

    /// Cache connectivity failure
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// The store write committed but the cache could not be brought in line
    #[error("Product {id} was stored but the cache was not updated: {reason}")]
    CacheAfterCommit { id: u64, reason: String },
}

// == Conversions ==
impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        CatalogError::Store(err.to_string())
    }
}

impl From<redis::RedisError> for CatalogError {
    fn from(err: redis::RedisError) -> Self {
        CatalogError::CacheUnavailable(err.to_string())
    }
}

impl From<deadpool_redis::PoolError> for CatalogError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        CatalogError::CacheUnavailable(format!("Failed to get Redis connection: {}", err))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::CacheUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CatalogError::CacheAfterCommit { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the catalog service.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CatalogError::NotFound(1), StatusCode::NOT_FOUND),
            (
                CatalogError::InvalidRequest("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                CatalogError::Store("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                CatalogError::CacheUnavailable("down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                CatalogError::CacheAfterCommit {
                    id: 1,
                    reason: "down".into(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
