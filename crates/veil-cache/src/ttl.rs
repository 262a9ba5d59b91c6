// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lazy-expiry TTL key/value store with an optional background sweep.
//!
//! Expiry is enforced on read: `get` and `has` evict and report absent as soon
//! as an entry's age exceeds its ttl. The sweep only reclaims memory for
//! entries nobody reads.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Time-to-live applied by [`TtlCache::set`].
pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

/// Interval between background sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_millis(60_000);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > self.ttl
    }
}

type Entries<V> = Arc<Mutex<HashMap<String, CacheEntry<V>>>>;

/// A string-keyed cache whose entries expire after a per-entry ttl.
pub struct TtlCache<V> {
    entries: Entries<V>,
    default_ttl: Duration,
    sweeper: Option<CancellationToken>,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + 'static,
{
    /// Create a cache without a background sweep.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            default_ttl,
            sweeper: None,
        }
    }

    /// Create a cache and spawn its sweep task on the current tokio runtime.
    ///
    /// The task stops when [`TtlCache::stop_sweeper`] is called or the cache
    /// is dropped.
    pub fn with_sweeper(default_ttl: Duration, sweep_interval: Duration) -> Self {
        let mut cache = Self::new(default_ttl);
        let token = CancellationToken::new();
        spawn_sweeper(Arc::clone(&cache.entries), sweep_interval, token.clone());
        cache.sweeper = Some(token);
        cache
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Store `value` with the default ttl.
    pub async fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Store `value` with an explicit ttl, replacing any previous entry.
    pub async fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let entry = CacheEntry {
            value,
            created_at: Instant::now(),
            ttl,
        };
        self.entries.lock().await.insert(key.into(), entry);
    }

    /// The live value for `key`. An expired entry is evicted and reported absent.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().await;
        let expired = entries.get(key)?.is_expired(Instant::now());
        if expired {
            entries.remove(key);
            debug!(key, "evicted expired cache entry on read");
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Whether `key` holds a live value. Evicts an expired entry.
    pub async fn has(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let Some(entry) = entries.get(key) else {
            return false;
        };
        if entry.is_expired(Instant::now()) {
            entries.remove(key);
            return false;
        }
        true
    }

    /// Remove `key`. Returns `true` if an entry (live or expired) was removed.
    pub async fn delete(&self, key: &str) -> bool {
        self.entries.lock().await.remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Remove every expired entry now. Returns how many were removed.
    pub async fn sweep(&self) -> usize {
        sweep_entries(&self.entries).await
    }

    /// Stop the background sweep, if one is running.
    pub fn stop_sweeper(&self) {
        if let Some(token) = &self.sweeper {
            token.cancel();
        }
    }

    pub fn has_sweeper(&self) -> bool {
        self.sweeper.as_ref().is_some_and(|t| !t.is_cancelled())
    }
}

impl<V> Drop for TtlCache<V> {
    fn drop(&mut self) {
        if let Some(token) = &self.sweeper {
            token.cancel();
        }
    }
}

async fn sweep_entries<V>(entries: &Mutex<HashMap<String, CacheEntry<V>>>) -> usize {
    let now = Instant::now();
    let mut entries = entries.lock().await;
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(now));
    before - entries.len()
}

fn spawn_sweeper<V>(entries: Entries<V>, interval: Duration, token: CancellationToken)
where
    V: Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("cache sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = sweep_entries(&entries).await;
                    if removed > 0 {
                        debug!(removed, "swept expired cache entries");
                    }
                }
            }
        }
    });
}
