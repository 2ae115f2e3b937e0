//! Cache Store Module
//!
//! Fetch-through cache engine: a HashMap of cached upstream responses with
//! TTL staleness, a capacity bound with LRU eviction, and an async memoizer
//! that wraps the synchronous core behind an RwLock.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheStats, LruTracker};
use crate::error::Result;

// == Cache Store ==
/// Synchronous cache core: key-value storage with LRU capacity eviction.
///
/// Stale entries are handled lazily. A lookup of a stale entry counts as a
/// miss but leaves the entry in place; only a later successful refresh
/// overwrites it. There is no background sweep.
#[derive(Debug)]
pub struct CacheStore {
    /// Cached responses by request shape
    entries: HashMap<CacheKey, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore bounded to `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
        }
    }

    // == Lookup ==
    /// Retrieves the cached value for a key, if present and fresh.
    ///
    /// A fresh entry is a hit: its value is returned and the key is marked
    /// most recently used. A stale or absent entry is a miss and returns
    /// None; the caller is expected to refresh via the upstream.
    pub fn lookup(&mut self, key: &CacheKey) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh() => {
                let value = entry.value.clone();
                self.stats.record_hit();
                self.lru.touch(key);
                Some(value)
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Insert ==
    /// Stores a freshly resolved value under `key`, overwriting any prior
    /// entry and resetting its capture time.
    ///
    /// When inserting a new key at capacity, the least recently used key is
    /// evicted first.
    pub fn insert(&mut self, key: CacheKey, value: Value, ttl: Duration) {
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, "evicted least recently used entry");
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, ttl));
        self.lru.touch(&key);
        self.stats.record_refresh();
        self.stats.set_total_entries(self.entries.len());
    }

    // == Clear ==
    /// Removes all entries unconditionally.
    ///
    /// Returns the number of entries removed. Hit/miss counters are left
    /// intact; they describe traffic, not contents.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Snapshot ==
    /// Produces a point-in-time view of every entry, sorted by key.
    ///
    /// Ages and remaining lifetimes are computed from the current time at
    /// call time. Stale entries that have not yet been overwritten appear
    /// with a remaining life of 0.
    pub fn snapshot(&self) -> Vec<EntryStatus> {
        let mut entries: Vec<EntryStatus> = self
            .entries
            .iter()
            .map(|(key, entry)| EntryStatus {
                key: key.to_string(),
                age_secs: entry.age_ms() / 1000,
                expires_secs: entry.expires_in_ms() / 1000,
            })
            .collect();

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Entry Status ==
/// Point-in-time view of a single cached entry.
#[derive(Debug, Clone)]
pub struct EntryStatus {
    /// Canonical request-shape key
    pub key: String,
    /// Seconds since capture
    pub age_secs: u64,
    /// Seconds until expiration (0 when stale)
    pub expires_secs: u64,
}

// == Cache Status ==
/// Point-in-time view of the whole cache.
#[derive(Debug, Clone)]
pub struct CacheStatus {
    /// Current number of entries
    pub size: usize,
    /// Configured TTL
    pub ttl: Duration,
    /// Per-entry ages and remaining lifetimes
    pub entries: Vec<EntryStatus>,
}

// == Fetch Cache ==
/// Async fetch-through memoizer around [`CacheStore`].
///
/// An explicit instance with its own lifecycle: created at startup, shared
/// across handlers, discarded at process exit. The lock guards lookup and
/// insert but is never held across the awaited upstream call, so concurrent
/// callers missing the same key each perform their own upstream fetch
/// (duplicate fetches are not coalesced).
#[derive(Debug)]
pub struct FetchCache {
    /// Synchronous core behind the runtime's lock
    store: RwLock<CacheStore>,
    /// TTL applied by [`FetchCache::fetch`]
    ttl: Duration,
}

impl FetchCache {
    // == Constructor ==
    /// Creates a new FetchCache.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold
    /// * `ttl` - Freshness window applied by [`FetchCache::fetch`]
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            store: RwLock::new(CacheStore::new(max_entries)),
            ttl,
        }
    }

    // == Configured TTL ==
    /// Returns the configured freshness window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Fetch ==
    /// Fetch-through lookup using the configured TTL.
    ///
    /// See [`FetchCache::fetch_with_ttl`].
    pub async fn fetch<F, Fut>(&self, key: &CacheKey, resolver: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        self.fetch_with_ttl(key, self.ttl, resolver).await
    }

    // == Fetch With TTL ==
    /// Returns the cached value for `key` if still fresh; otherwise invokes
    /// `resolver`, stores its result under `key`, and returns it.
    ///
    /// A resolver failure propagates unchanged: no entry is written, nothing
    /// is retried, and any stale entry for the key is left as it was.
    pub async fn fetch_with_ttl<F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        resolver: F,
    ) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        {
            let mut store = self.store.write().await;
            if let Some(value) = store.lookup(key) {
                debug!(key = %key, "cache hit");
                return Ok(value);
            }
        }

        // Miss or stale. The lock is released while the resolver runs, so
        // concurrent callers for the same key each fetch independently and
        // the last write wins.
        debug!(key = %key, "cache miss, resolving upstream");
        let value = resolver().await?;

        let mut store = self.store.write().await;
        store.insert(key.clone(), value.clone(), ttl);
        Ok(value)
    }

    // == Clear ==
    /// Removes all entries unconditionally. Idempotent.
    ///
    /// Returns the number of entries removed.
    pub async fn clear(&self) -> usize {
        self.store.write().await.clear()
    }

    // == Status ==
    /// Produces a snapshot of the cache: entry count, configured TTL, and
    /// per-entry age/remaining life computed at call time.
    pub async fn status(&self) -> CacheStatus {
        let store = self.store.read().await;
        CacheStatus {
            size: store.len(),
            ttl: self.ttl,
            entries: store.snapshot(),
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Length ==
    /// Returns the current number of entries.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProxyError;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread::sleep;

    const TTL: Duration = Duration::from_secs(300);

    fn key(path: &str) -> CacheKey {
        CacheKey::new(path, &BTreeMap::new())
    }

    // -- CacheStore --

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_insert_and_lookup() {
        let mut store = CacheStore::new(100);

        store.insert(key("/products"), json!([1, 2, 3]), TTL);

        assert_eq!(store.lookup(&key("/products")), Some(json!([1, 2, 3])));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_lookup_absent_is_miss() {
        let mut store = CacheStore::new(100);

        assert_eq!(store.lookup(&key("/nothing")), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_overwrite_keeps_one_entry() {
        let mut store = CacheStore::new(100);

        store.insert(key("/products"), json!("first"), TTL);
        store.insert(key("/products"), json!("second"), TTL);

        assert_eq!(store.lookup(&key("/products")), Some(json!("second")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_stale_lookup_is_miss_but_entry_remains() {
        let mut store = CacheStore::new(100);

        store.insert(key("/products"), json!("old"), Duration::from_millis(30));
        sleep(Duration::from_millis(60));

        assert_eq!(store.lookup(&key("/products")), None);
        // Stale entry lingers until a successful refresh overwrites it
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_stale_entry_refreshed_by_insert() {
        let mut store = CacheStore::new(100);

        store.insert(key("/products"), json!("old"), Duration::from_millis(30));
        sleep(Duration::from_millis(60));

        store.insert(key("/products"), json!("new"), TTL);

        assert_eq!(store.lookup(&key("/products")), Some(json!("new")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_capacity_evicts_lru() {
        let mut store = CacheStore::new(3);

        store.insert(key("/a"), json!(1), TTL);
        store.insert(key("/b"), json!(2), TTL);
        store.insert(key("/c"), json!(3), TTL);

        // Touch /a so /b becomes the eviction candidate
        store.lookup(&key("/a"));

        store.insert(key("/d"), json!(4), TTL);

        assert_eq!(store.len(), 3);
        assert!(store.lookup(&key("/a")).is_some());
        assert!(store.lookup(&key("/b")).is_none());
        assert!(store.lookup(&key("/d")).is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_clear_idempotent() {
        let mut store = CacheStore::new(100);

        assert_eq!(store.clear(), 0);

        store.insert(key("/a"), json!(1), TTL);
        store.insert(key("/b"), json!(2), TTL);

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert_eq!(store.clear(), 0);
        assert!(store.lookup(&key("/a")).is_none());
    }

    #[test]
    fn test_store_clear_preserves_counters() {
        let mut store = CacheStore::new(100);

        store.insert(key("/a"), json!(1), TTL);
        store.lookup(&key("/a"));
        store.clear();

        assert_eq!(store.stats().hits, 1);
        assert_eq!(store.stats().total_entries, 0);
    }

    #[test]
    fn test_store_snapshot_sorted_by_key() {
        let mut store = CacheStore::new(100);

        store.insert(key("/b"), json!(2), TTL);
        store.insert(key("/a"), json!(1), TTL);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].key, "/a");
        assert_eq!(snapshot[1].key, "/b");
        assert!(snapshot.iter().all(|e| e.expires_secs <= TTL.as_secs()));
    }

    // -- FetchCache --

    fn counting_resolver(
        counter: Arc<AtomicUsize>,
        value: Value,
    ) -> impl FnOnce() -> std::future::Ready<Result<Value>> {
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Ok(value))
        }
    }

    #[tokio::test]
    async fn test_fetch_miss_resolves_once_and_stores() {
        let cache = FetchCache::new(100, TTL);
        let calls = Arc::new(AtomicUsize::new(0));

        let value = cache
            .fetch(&key("/products"), counting_resolver(calls.clone(), json!(["a"])))
            .await
            .unwrap();

        assert_eq!(value, json!(["a"]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_fetch_hit_skips_resolver() {
        let cache = FetchCache::new(100, TTL);
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache
            .fetch(&key("/products"), counting_resolver(calls.clone(), json!(42)))
            .await
            .unwrap();
        let second = cache
            .fetch(&key("/products"), counting_resolver(calls.clone(), json!(99)))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_stale_resolves_again_and_replaces() {
        let cache = FetchCache::new(100, TTL);
        let calls = Arc::new(AtomicUsize::new(0));
        let short = Duration::from_millis(40);

        let first = cache
            .fetch_with_ttl(
                &key("/products"),
                short,
                counting_resolver(calls.clone(), json!("v1")),
            )
            .await
            .unwrap();
        assert_eq!(first, json!("v1"));

        tokio::time::sleep(Duration::from_millis(80)).await;

        let second = cache
            .fetch_with_ttl(
                &key("/products"),
                short,
                counting_resolver(calls.clone(), json!("v2")),
            )
            .await
            .unwrap();

        assert_eq!(second, json!("v2"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.stats().await.refreshes, 2);
    }

    #[tokio::test]
    async fn test_fetch_resolver_failure_writes_nothing() {
        let cache = FetchCache::new(100, TTL);

        let result = cache
            .fetch(&key("/products"), || async {
                Err(ProxyError::Internal("upstream exploded".to_string()))
            })
            .await;

        assert!(matches!(result, Err(ProxyError::Internal(_))));
        assert_eq!(cache.len().await, 0);
        assert_eq!(cache.stats().await.refreshes, 0);

        // The key is still resolvable afterwards
        let calls = Arc::new(AtomicUsize::new(0));
        let value = cache
            .fetch(&key("/products"), counting_resolver(calls.clone(), json!("ok")))
            .await
            .unwrap();
        assert_eq!(value, json!("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_failed_refresh_leaves_stale_entry() {
        let cache = FetchCache::new(100, TTL);
        let short = Duration::from_millis(30);

        cache
            .fetch_with_ttl(&key("/products"), short, || async { Ok(json!("old")) })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;

        let result = cache
            .fetch_with_ttl(&key("/products"), short, || async {
                Err(ProxyError::Internal("down".to_string()))
            })
            .await;

        assert!(result.is_err());
        // The stale entry was not touched; it still occupies its slot
        assert_eq!(cache.len().await, 1);
        let status = cache.status().await;
        assert_eq!(status.entries[0].expires_secs, 0);
    }

    #[tokio::test]
    async fn test_fetch_concurrent_misses_both_resolve() {
        let cache = Arc::new(FetchCache::new(100, TTL));
        let calls = Arc::new(AtomicUsize::new(0));

        let slow_resolver = |calls: Arc<AtomicUsize>, value: Value| {
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(value)
            }
        };

        let k = key("/products");
        let (a, b) = tokio::join!(
            cache.fetch(&k, slow_resolver(calls.clone(), json!("first"))),
            cache.fetch(&k, slow_resolver(calls.clone(), json!("second"))),
        );

        // No single-flight coalescing: both callers fetched upstream
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_clear_then_next_lookup_misses() {
        let cache = FetchCache::new(100, TTL);
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .fetch(&key("/products"), counting_resolver(calls.clone(), json!(1)))
            .await
            .unwrap();

        assert_eq!(cache.clear().await, 1);
        assert_eq!(cache.status().await.size, 0);

        cache
            .fetch(&key("/products"), counting_resolver(calls.clone(), json!(2)))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_status_reports_entries() {
        let cache = FetchCache::new(100, TTL);

        cache
            .fetch(&key("/products"), || async { Ok(json!([])) })
            .await
            .unwrap();
        cache
            .fetch(&key("/products/1"), || async { Ok(json!({})) })
            .await
            .unwrap();

        let status = cache.status().await;
        assert_eq!(status.size, 2);
        assert_eq!(status.ttl, cache.ttl());
        assert_eq!(status.entries.len(), 2);
        for entry in &status.entries {
            assert!(entry.expires_secs <= TTL.as_secs());
        }
    }
}
