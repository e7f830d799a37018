//! Response DTOs for the catalog API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::coordinator::StatsSnapshot;
use crate::product::Product;

/// Response body for create-or-update and transactional update
#[derive(Debug, Clone, Serialize)]
pub struct WriteResponse {
    /// `created/updated` or `updated`
    pub status: String,
    /// The product as written
    pub product: Product,
}

impl WriteResponse {
    pub fn created_or_updated(product: Product) -> Self {
        Self {
            status: "created/updated".to_string(),
            product,
        }
    }

    pub fn updated(product: Product) -> Self {
        Self {
            status: "updated".to_string(),
            product,
        }
    }
}

/// Response body for DELETE /v1/products/:id
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub status: String,
    pub id: u64,
    /// Whether the store held a row for the id
    pub existed: bool,
}

impl DeleteResponse {
    pub fn new(id: u64, existed: bool) -> Self {
        Self {
            status: "deleted".to_string(),
            id,
            existed,
        }
    }
}

/// Response body for POST /v1/products/invalidate/:id
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub status: String,
    pub id: u64,
    /// Whether an entry was cached at the time
    pub was_cached: bool,
}

impl InvalidateResponse {
    pub fn new(id: u64, was_cached: bool) -> Self {
        Self {
            status: "cache invalidated".to_string(),
            id,
            was_cached,
        }
    }
}

/// Response body for the stats endpoint (GET /v1/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub counters: StatsSnapshot,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<StatsSnapshot> for StatsResponse {
    fn from(counters: StatsSnapshot) -> Self {
        let hit_rate = counters.hit_rate();
        Self { counters, hit_rate }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// "up" or "unavailable"
    pub database: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self::with_status("healthy", "up")
    }

    /// The durable store did not answer.
    pub fn unhealthy() -> Self {
        Self::with_status("unhealthy", "unavailable")
    }

    fn with_status(status: &str, database: &str) -> Self {
        Self {
            status: status.to_string(),
            database: database.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
