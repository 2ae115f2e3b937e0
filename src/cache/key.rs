//! Cache Key Module
//!
//! Canonical serialization of a request shape (path + query parameters).

use std::collections::BTreeMap;
use std::fmt;

// == Cache Key ==
/// Deterministic identifier for a request shape.
///
/// Built from the resource path and its query parameters. Parameters are
/// emitted in lexicographic key order, so two requests that differ only in
/// parameter order produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    // == Constructor ==
    /// Creates a key from a resource path and its query parameters.
    ///
    /// An empty parameter map yields the bare path. Otherwise the key is
    /// `path?k1=v1&k2=v2` with pairs in ascending key order.
    pub fn new(path: &str, params: &BTreeMap<String, String>) -> Self {
        if params.is_empty() {
            return Self(path.to_string());
        }

        let query: Vec<String> = params
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();

        Self(format!("{}?{}", path, query.join("&")))
    }

    // == As Str ==
    /// Returns the canonical string form of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
