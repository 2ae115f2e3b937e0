//! Store Proxy - a caching reverse proxy for an upstream store API
//!
//! Forwards read-only product queries upstream and memoizes the JSON
//! responses in an in-memory TTL cache with LRU capacity eviction.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
