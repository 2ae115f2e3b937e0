//! Upstream Module
//!
//! HTTP client for the proxied store API.

mod client;

pub use client::StoreClient;
