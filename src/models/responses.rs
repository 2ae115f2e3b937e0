//! Response DTOs for the caching proxy API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, CacheStatus};

/// Response body for the cache clear operation (POST /cache/clear)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Always true on success
    pub success: bool,
    /// Human-readable confirmation
    pub message: String,
    /// Time of the clear in RFC 3339 format
    pub timestamp: String,
}

impl ClearResponse {
    /// Creates a new ClearResponse for a clear that removed `removed` entries
    pub fn new(removed: usize) -> Self {
        Self {
            success: true,
            message: format!("Cache cleared, {} entries removed", removed),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Per-entry view inside the status report (GET /cache/status)
#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    /// Canonical request-shape key
    pub key: String,
    /// Seconds since the entry was captured
    pub age: u64,
    /// Seconds until the entry goes stale (0 if already stale)
    pub expires: u64,
}

/// Cache-wide view inside the status report (GET /cache/status)
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    /// Current number of cached entries
    pub size: usize,
    /// Configured freshness window in seconds
    pub timeout: u64,
    /// Per-entry ages and remaining lifetimes, sorted by key
    pub entries: Vec<EntryReport>,
}

/// Response body for the status endpoint (GET /cache/status)
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// Always true on success
    pub success: bool,
    /// The snapshot itself
    pub cache: CacheReport,
}

impl StatusResponse {
    /// Creates a new StatusResponse from a cache snapshot
    pub fn new(status: CacheStatus) -> Self {
        Self {
            success: true,
            cache: CacheReport {
                size: status.size,
                timeout: status.ttl.as_secs(),
                entries: status
                    .entries
                    .into_iter()
                    .map(|entry| EntryReport {
                        key: entry.key,
                        age: entry.age_secs,
                        expires: entry.expires_secs,
                    })
                    .collect(),
            },
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses (absent or stale)
    pub misses: u64,
    /// Number of upstream responses stored
    pub refreshes: u64,
    /// Number of capacity evictions
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            refreshes: stats.refreshes,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
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
    /// Creates a new ErrorResponse
    #[allow(dead_code)]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
