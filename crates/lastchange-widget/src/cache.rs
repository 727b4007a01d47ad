//! In-process TTL cache that shields the upstream API from repeated requests
//!
//! Entries live for a fixed time from the moment they are written; reads never
//! extend that lifetime. Freshness is judged against an injected [`Clock`] so
//! expiry can be exercised without sleeping.

use crate::types::CacheStats;
use chrono::{DateTime, TimeDelta, Utc};
use moka::future::Cache;
use moka::Expiry;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Lifetime of every cached upstream answer
pub const DATA_TTL: Duration = Duration::from_secs(60 * 60);

/// Source of "now" for expiry decisions
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
    ttl: Duration,
}

/// Lets the backing store drop an entry once its own TTL has run out
struct EntryExpiry;

impl<V> Expiry<String, CacheEntry<V>> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Key/value store with per-entry TTL and a get-or-compute entry point
pub struct TtlCache<V> {
    entries: Cache<String, CacheEntry<V>>,
    clock: Arc<dyn Clock>,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache; a disabled cache invokes the producer on every call
    pub fn new(clock: Arc<dyn Clock>, enabled: bool) -> Self {
        let entries = Cache::builder().expire_after(EntryExpiry).build();

        Self {
            entries,
            clock,
            enabled,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the live value for `key`, or run `producer` and store its result
    ///
    /// A failing producer leaves the cache untouched and its error is returned
    /// as-is. Concurrent misses on the same key may each run the producer; the
    /// last write wins.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        if !self.enabled {
            return producer().await;
        }

        if let Some(entry) = self.entries.get(key).await {
            if self.clock.now() < entry.expires_at {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key, "Cache hit");
                return Ok(entry.value);
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key, "Cache miss");

        let value = producer().await?;

        let expires_at = self
            .clock
            .now()
            .checked_add_signed(TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.entries
            .insert(
                key.to_string(),
                CacheEntry {
                    value: value.clone(),
                    expires_at,
                    ttl,
                },
            )
            .await;

        Ok(value)
    }

    /// Counters plus the number of stored entries, after flushing moka's
    /// pending maintenance so recent writes are counted
    pub async fn stats(&self) -> CacheStats {
        self.entries.run_pending_tasks().await;
        CacheStats {
            entries: self.entries.entry_count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
