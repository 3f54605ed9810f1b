//! Time-bounded cache over the expensive fetch-and-merge call.
//!
//! The spreadsheet API is rate limited, so the merged record set is cached
//! for a TTL and refreshed at most once at a time: the entry lives behind an
//! async mutex that is held across the refresh, so concurrent misses wait for
//! the in-flight fetch instead of duplicating it. A failed refresh falls back
//! to the previous entry at any age; the error only propagates when there is
//! nothing to fall back to.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::models::RecordSet;
use crate::sheets::DataSourceError;

/// Time source, injected so tests can drive expiry deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    records: Arc<RecordSet>,
    fetched_at: Instant,
}

/// TTL cache with stale-data-on-error fallback.
pub struct FreshnessCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: Mutex<Option<CacheEntry>>,
}

impl FreshnessCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entry: Mutex::new(None),
        }
    }

    /// Return the cached record set, refreshing through `fetch` when the
    /// entry is missing or older than the TTL.
    ///
    /// On refresh failure the previous entry, regardless of age, is returned
    /// and the error logged; the error only reaches the caller on a cold
    /// cache. The entry is replaced wholesale, never patched in place.
    pub async fn get_or_refresh<F, Fut>(&self, fetch: F) -> Result<Arc<RecordSet>, DataSourceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RecordSet, DataSourceError>>,
    {
        let mut entry = self.entry.lock().await;

        if let Some(cached) = entry.as_ref() {
            if self.clock.now().duration_since(cached.fetched_at) < self.ttl {
                debug!(rows = cached.records.len(), "serving fresh cached records");
                return Ok(Arc::clone(&cached.records));
            }
        }

        match fetch().await {
            Ok(records) => {
                let records = Arc::new(records);
                *entry = Some(CacheEntry {
                    records: Arc::clone(&records),
                    fetched_at: self.clock.now(),
                });
                debug!(rows = records.len(), "cache refreshed");
                Ok(records)
            }
            Err(err) => match entry.as_ref() {
                Some(stale) => {
                    warn!(error = %err, "refresh failed, serving stale cached records");
                    Ok(Arc::clone(&stale.records))
                }
                None => Err(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Clock the tests advance by hand.
    struct ManualClock {
        start: Instant,
        offset: std::sync::Mutex<Duration>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                start: Instant::now(),
                offset: std::sync::Mutex::new(Duration::ZERO),
            }
        }

        fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.start + *self.offset.lock().unwrap()
        }
    }

    fn row(id: &str) -> crate::models::Record {
        let mut r = crate::models::Record::new();
        r.insert("OrderID".into(), serde_json::json!(id));
        r
    }

    #[tokio::test]
    async fn fresh_hit_performs_no_fetch() {
        let clock = Arc::new(ManualClock::new());
        let cache = FreshnessCache::with_clock(Duration::from_secs(300), clock.clone());
        let fetches = AtomicUsize::new(0);

        let fetch = || {
            fetches.fetch_add(1, Ordering::SeqCst);
            async { Ok(vec![row("A1")]) }
        };

        let first = cache.get_or_refresh(fetch).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        clock.advance(Duration::from_secs(299));
        let second = cache
            .get_or_refresh(|| {
                fetches.fetch_add(1, Ordering::SeqCst);
                async { Ok(vec![row("B2")]) }
            })
            .await
            .unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 1, "within TTL must not refetch");
        assert_eq!(second[0]["OrderID"], serde_json::json!("A1"));
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_refresh() {
        let cache = Arc::new(FreshnessCache::new(Duration::from_secs(300)));
        let fetches = Arc::new(AtomicUsize::new(0));

        // Two simultaneous misses against a slow fetch; the second must wait
        // for the in-flight refresh instead of starting its own.
        let mut handles = Vec::new();
        for _ in 0..2 {
            let cache = Arc::clone(&cache);
            let fetches = Arc::clone(&fetches);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_refresh(|| async move {
                        fetches.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(vec![row("A1")])
                    })
                    .await
                    .unwrap()
            }));
        }

        let first = handles.pop().unwrap().await.unwrap();
        let second = handles.pop().unwrap().await.unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 1, "refresh must not be duplicated");
        assert!(
            Arc::ptr_eq(&first, &second),
            "both callers must observe the same entry"
        );
    }

    #[tokio::test]
    async fn expired_entry_refreshes() {
        let clock = Arc::new(ManualClock::new());
        let cache = FreshnessCache::with_clock(Duration::from_secs(300), clock.clone());

        cache
            .get_or_refresh(|| async { Ok(vec![row("A1")]) })
            .await
            .unwrap();
        clock.advance(Duration::from_secs(301));

        let refreshed = cache
            .get_or_refresh(|| async { Ok(vec![row("B2")]) })
            .await
            .unwrap();
        assert_eq!(refreshed[0]["OrderID"], serde_json::json!("B2"));
    }

    #[tokio::test]
    async fn failed_refresh_falls_back_to_stale_entry() {
        let clock = Arc::new(ManualClock::new());
        let cache = FreshnessCache::with_clock(Duration::from_secs(300), clock.clone());

        cache
            .get_or_refresh(|| async { Ok(vec![row("A1")]) })
            .await
            .unwrap();
        clock.advance(Duration::from_secs(3600));

        let fallback = cache
            .get_or_refresh(|| async { Err(DataSourceError::RateLimited) })
            .await
            .unwrap();
        assert_eq!(fallback[0]["OrderID"], serde_json::json!("A1"));
    }

    #[tokio::test]
    async fn cold_cache_propagates_fetch_failure() {
        let cache = FreshnessCache::new(Duration::from_secs(300));
        let err = cache
            .get_or_refresh(|| async { Err(DataSourceError::RateLimited) })
            .await
            .unwrap_err();
        assert!(matches!(err, DataSourceError::RateLimited));
    }
}
