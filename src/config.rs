//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream store API
    pub upstream_url: String,
    /// Freshness window for cached responses, in seconds
    pub cache_ttl: u64,
    /// Maximum number of cached entries
    pub max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Upstream request timeout in seconds
    pub upstream_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `UPSTREAM_URL` - Upstream store API base URL (default: https://fakestoreapi.com)
    /// - `CACHE_TTL` - Response freshness window in seconds (default: 300)
    /// - `MAX_ENTRIES` - Maximum cached entries (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `UPSTREAM_TIMEOUT` - Upstream request timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        Self {
            upstream_url: env::var("UPSTREAM_URL")
                .unwrap_or_else(|_| "https://fakestoreapi.com".to_string()),
            cache_ttl: env::var("CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            max_entries: env::var("MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            upstream_timeout: env::var("UPSTREAM_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_url: "https://fakestoreapi.com".to_string(),
            cache_ttl: 300,
            max_entries: 1000,
            server_port: 3000,
            upstream_timeout: 10,
        }
    }
}
