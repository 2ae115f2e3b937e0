//! Cache Module
//!
//! Fetch-through memoization of upstream responses with TTL staleness and
//! LRU capacity eviction.

mod entry;
mod key;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::{CacheStatus, CacheStore, EntryStatus, FetchCache};
