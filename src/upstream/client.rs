//! Upstream Store Client
//!
//! Thin reqwest wrapper that fetches JSON from the configured store API.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{ProxyError, Result};

// == Store Client ==
/// HTTP client for the upstream store API.
///
/// Cheap to clone; the underlying reqwest client is shared. The request
/// timeout set at construction is the only cancellation applied to
/// upstream calls.
#[derive(Debug, Clone)]
pub struct StoreClient {
    /// Shared HTTP client with the configured timeout
    http: reqwest::Client,
    /// Upstream base URL, without trailing slash
    base_url: String,
}

impl StoreClient {
    // == Constructor ==
    /// Creates a client for the given base URL with a request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    // == Base URL ==
    /// Returns the configured upstream base URL.
    #[allow(dead_code)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // == Fetch JSON ==
    /// Performs a GET against `{base_url}{path}` with the given query
    /// parameters and decodes the response body as JSON.
    ///
    /// Transport and decode failures map to [`ProxyError::Upstream`];
    /// a non-success status maps to [`ProxyError::UpstreamStatus`].
    pub async fn fetch_json(&self, path: &str, params: &BTreeMap<String, String>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "fetching upstream");

        let mut request = self.http.get(&url);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ProxyError::UpstreamStatus {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        Ok(response.json().await?)
    }
}
