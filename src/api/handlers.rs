//! API Handlers
//!
//! HTTP request handlers for each catalog endpoint. Each one binds the
//! request, calls a single coordinator operation and shapes the response.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use crate::coordinator::CatalogCoordinator;
use crate::error::{CatalogError, Result};
use crate::models::{
    CreateProductRequest, DeleteResponse, HealthResponse, InvalidateResponse, StatsResponse,
    UpdateProductRequest, WriteResponse,
};
use crate::product::Product;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<CatalogCoordinator>,
}

impl AppState {
    pub fn new(coordinator: CatalogCoordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }
}

/// Handler for POST /v1/products/
pub async fn create_product_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<WriteResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CatalogError::InvalidRequest(error_msg));
    }

    let product = state
        .coordinator
        .create_or_update(req.id, req.name, req.price)
        .await?;

    Ok(Json(WriteResponse::created_or_updated(product)))
}

/// Handler for GET /v1/products/:id
///
/// The view is recorded only after a successful lookup.
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Product>> {
    let product = state.coordinator.lookup(id).await?;
    state.coordinator.record_recent_access(id).await;

    Ok(Json(product))
}

/// Handler for PUT /v1/products/:id
pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<WriteResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CatalogError::InvalidRequest(error_msg));
    }

    let product = state
        .coordinator
        .update_transactional(id, req.name, req.price)
        .await?;

    Ok(Json(WriteResponse::updated(product)))
}

/// Handler for DELETE /v1/products/:id
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>> {
    let existed = state.coordinator.delete_event_based(id).await?;
    Ok(Json(DeleteResponse::new(id, existed)))
}

/// Handler for POST /v1/products/invalidate/:id
pub async fn invalidate_product_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<InvalidateResponse>> {
    let was_cached = state.coordinator.invalidate(id).await?;
    Ok(Json(InvalidateResponse::new(id, was_cached)))
}

/// Handler for GET /v1/products/recent
pub async fn recent_products_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.coordinator.recent_products().await?))
}

/// Handler for GET /v1/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.coordinator.stats().into())
}

/// Handler for GET /health
///
/// Answers 503 when the durable store cannot be queried.
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    match state.coordinator.store_health().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::healthy())),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::unhealthy()),
            )
        }
    }
}
