//! API Module
//!
//! HTTP handlers and routing for the product catalog REST API.
//!
//! # Endpoints
//! - `POST /v1/products/` - Create or replace a product (write-through)
//! - `GET /v1/products/:id` - Read a product (cache-aside) and record the view
//! - `PUT /v1/products/:id` - Transactional update
//! - `DELETE /v1/products/:id` - Delete and invalidate
//! - `POST /v1/products/invalidate/:id` - Drop the cached copy
//! - `GET /v1/products/recent` - Recently viewed products
//! - `GET /v1/stats` - Coordinator statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
