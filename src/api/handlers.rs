//! API Handlers
//!
//! HTTP request handlers for the proxy and cache-control endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::cache::{CacheKey, FetchCache};
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::{ClearResponse, HealthResponse, StatsResponse, StatusResponse};
use crate::upstream::StoreClient;

/// Application state shared across all handlers.
///
/// The cache is an explicit instance injected here rather than a module
/// level singleton, so tests can build isolated instances.
#[derive(Clone)]
pub struct AppState {
    /// Shared fetch-through cache
    pub cache: Arc<FetchCache>,
    /// Upstream store API client
    pub upstream: StoreClient,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(cache: FetchCache, upstream: StoreClient) -> Self {
        Self {
            cache: Arc::new(cache),
            upstream,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = FetchCache::new(config.max_entries, Duration::from_secs(config.cache_ttl));
        let upstream = StoreClient::new(
            &config.upstream_url,
            Duration::from_secs(config.upstream_timeout),
        )?;
        Ok(Self::new(cache, upstream))
    }
}

/// Handler for GET /products
///
/// Fetch-through proxy of the upstream product list. The response is served
/// from the cache while fresh; otherwise the upstream is queried and the
/// body memoized under the canonical request shape.
pub async fn products_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<Value>> {
    let key = CacheKey::new("/products", &params);

    let upstream = state.upstream.clone();
    let query = params.clone();
    let value = state
        .cache
        .fetch(&key, move || async move {
            upstream.fetch_json("/products", &query).await
        })
        .await?;

    Ok(Json(value))
}

/// Handler for GET /products/:id
///
/// Fetch-through proxy of a single upstream product. Ids are numeric on the
/// upstream surface; anything else is rejected before going upstream.
pub async fn product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<Value>> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ProxyError::InvalidRequest(format!(
            "product id must be numeric, got '{}'",
            id
        )));
    }

    let path = format!("/products/{}", id);
    let key = CacheKey::new(&path, &params);

    let upstream = state.upstream.clone();
    let query = params.clone();
    let value = state
        .cache
        .fetch(&key, move || async move {
            upstream.fetch_json(&path, &query).await
        })
        .await?;

    Ok(Json(value))
}

/// Handler for POST /cache/clear
///
/// Unconditionally removes all cached entries.
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.cache.clear().await;
    info!(removed, "cache cleared by request");

    Json(ClearResponse::new(removed))
}

/// Handler for GET /cache/status
///
/// Reports a snapshot of the cache: entry count, configured TTL, and
/// per-entry age/remaining life computed at call time.
pub async fn cache_status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let status = state.cache.status().await;

    Json(StatusResponse::new(status))
}

/// Handler for GET /stats
///
/// Returns hit/miss/eviction counters for the cache.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;

    Json(StatsResponse::new(&stats))
}

/// Handler for GET /health
///
/// Returns health status of the proxy.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
