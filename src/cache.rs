//! Keyed response cache with stale-on-error fallback.
//!
//! Each synced domain keeps one `ResponseCache` over its response type,
//! keyed by the query that produced the response. Entries never expire
//! on their own; freshness is judged per call against the TTL the
//! caller passes, and expired entries stick around so a failed refetch
//! can fall back to them.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    fetched_at: Instant,
}

/// Keyed TTL cache over fallible fetchers.
#[derive(Debug, Default)]
pub struct ResponseCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> ResponseCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the entry for `key` if it is younger than `ttl`,
    /// otherwise runs `fetch` and stores the result.
    ///
    /// A failed fetch is answered with the existing entry for `key`
    /// regardless of its age; the error only surfaces when there is
    /// nothing to fall back to. The lock is not held across the fetch,
    /// so concurrent callers for the same key may each fetch; the last
    /// write wins.
    pub async fn get<E, F, Fut>(&self, key: &str, ttl: Duration, fetch: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        {
            let entries = self.entries.lock().await;
            if let Some(entry) = entries.get(key) {
                if entry.fetched_at.elapsed() < ttl {
                    return Ok(entry.value.clone());
                }
            }
        }

        match fetch().await {
            Ok(value) => {
                let mut entries = self.entries.lock().await;
                entries.insert(
                    key.to_string(),
                    CacheEntry {
                        value: value.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                Ok(value)
            }
            Err(error) => {
                let entries = self.entries.lock().await;
                match entries.get(key) {
                    Some(entry) => {
                        tracing::warn!("Serving stale entry for '{}': {}", key, error);
                        Ok(entry.value.clone())
                    }
                    None => Err(error),
                }
            }
        }
    }

    /// Drops every entry, fresh and stale alike.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Number of entries currently held.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(60);

    async fn counted(calls: &AtomicUsize, value: &str) -> Result<String, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(value.to_string())
    }

    async fn failing() -> Result<String, String> {
        Err("backend unreachable".to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_entry_skips_fetcher() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache.get("k", TTL, || counted(&calls, "v1")).await;
        assert_eq!(first, Ok("v1".to_string()));

        tokio::time::advance(Duration::from_secs(30)).await;

        let second = cache.get("k", TTL, failing).await;
        assert_eq!(second, Ok("v1".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_refetches() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);

        cache.get("k", TTL, || counted(&calls, "v1")).await.unwrap();
        tokio::time::advance(TTL + Duration::from_secs(1)).await;

        let refreshed = cache.get("k", TTL, || counted(&calls, "v2")).await;
        assert_eq!(refreshed, Ok("v2".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_is_per_call() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);

        cache.get("k", TTL, || counted(&calls, "v1")).await.unwrap();
        tokio::time::advance(Duration::from_secs(45)).await;

        // Same entry, stricter freshness bound: must refetch.
        let strict = cache
            .get("k", Duration::from_secs(10), || counted(&calls, "v2"))
            .await;
        assert_eq!(strict, Ok("v2".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_serves_stale_entry() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);

        cache.get("k", TTL, || counted(&calls, "v1")).await.unwrap();
        tokio::time::advance(TTL * 2).await;

        let fallback = cache.get("k", TTL, failing).await;
        assert_eq!(fallback, Ok("v1".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_without_entry_propagates() {
        let cache: ResponseCache<String> = ResponseCache::new();

        let result = cache.get("k", TTL, failing).await;
        assert_eq!(result, Err("backend unreachable".to_string()));
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);

        cache.get("a", TTL, || counted(&calls, "va")).await.unwrap();
        cache.get("b", TTL, || counted(&calls, "vb")).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len().await, 2);

        let hit = cache.get("a", TTL, failing).await;
        assert_eq!(hit, Ok("va".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_removes_stale_fallbacks() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);

        cache.get("k", TTL, || counted(&calls, "v1")).await.unwrap();
        cache.clear().await;
        assert!(cache.is_empty().await);

        let result = cache.get("k", TTL, failing).await;
        assert_eq!(result, Err("backend unreachable".to_string()));
    }
}
