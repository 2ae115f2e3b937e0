//! API Routes
//!
//! Configures the Axum router with all proxy endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_status_handler, clear_cache_handler, health_handler, product_handler, products_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /products` - Cached proxy of the upstream product list
/// - `GET /products/:id` - Cached proxy of a single product
/// - `POST /cache/clear` - Remove all cached entries
/// - `GET /cache/status` - Snapshot of cached entries and their ages
/// - `GET /stats` - Hit/miss/eviction counters
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/products", get(products_handler))
        .route("/products/:id", get(product_handler))
        .route("/cache/clear", post(clear_cache_handler))
        .route("/cache/status", get(cache_status_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
