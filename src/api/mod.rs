//! API Module
//!
//! HTTP handlers and routing for the caching proxy.
//!
//! # Endpoints
//! - `GET /products` - Cached proxy of the upstream product list
//! - `GET /products/:id` - Cached proxy of a single product
//! - `POST /cache/clear` - Remove all cached entries
//! - `GET /cache/status` - Snapshot of cached entries and their ages
//! - `GET /stats` - Hit/miss/eviction counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
