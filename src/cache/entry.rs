//! Cache Entry Module
//!
//! Defines the structure for individual cached responses with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// A single cached upstream response with its capture time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached response body (opaque JSON blob)
    pub value: Value,
    /// Capture timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry captured now, expiring after `ttl`.
    pub fn new(value: Value, ttl: Duration) -> Self {
        let now = current_timestamp_ms();

        Self {
            value,
            stored_at: now,
            expires_at: now + ttl.as_millis() as u64,
        }
    }

    // == Is Fresh ==
    /// Checks whether the entry is still within its TTL.
    ///
    /// Boundary condition: the entry is fresh while the current time is
    /// strictly before the expiration time. Once the full TTL has elapsed
    /// (current time >= expiration), the entry is stale and a lookup treats
    /// it as a miss.
    pub fn is_fresh(&self) -> bool {
        current_timestamp_ms() < self.expires_at
    }

    // == Age ==
    /// Returns the time elapsed since capture, in milliseconds.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.stored_at)
    }

    // == Remaining Life ==
    /// Returns remaining time before expiration in milliseconds.
    ///
    /// A stale entry reports 0.
    pub fn expires_in_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
