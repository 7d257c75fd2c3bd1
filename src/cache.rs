// src/cache.rs
// Generic TTL cache with get-or-fetch semantics fronting the external lookups.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::Mutex;

struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

/// TTL cache shared across concurrent requests.
///
/// Entries are inserted only on fetch success (no negative caching) and are
/// expiry-checked on every read; an expired entry is treated as absent and
/// overwritten by the next successful fetch. There is no background sweep.
/// A per-key gate serializes concurrent fetches for the same key without
/// blocking reads or fetches for unrelated keys.
pub struct TtlCache<K, V> {
    entries: DashMap<K, CacheEntry<V>>,
    inflight: DashMap<K, Arc<Mutex<()>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            inflight: DashMap::new(),
            ttl,
        }
    }

    /// Return the live value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).and_then(|e| {
            if e.fetched_at.elapsed() < self.ttl {
                Some(e.value.clone())
            } else {
                None
            }
        })
    }

    /// Return the cached value or run `fetch` to produce one.
    ///
    /// `fetch` carries its own retry/timeout policy; this layer only decides
    /// whether to call it. On success the value is stored with a fresh
    /// timestamp; on failure nothing is written, so the next call retries
    /// immediately instead of waiting out a TTL.
    pub async fn get_or_fetch<E, F, Fut>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(v) = self.get(&key) {
            return Ok(v);
        }

        let gate = self
            .inflight
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = gate.lock().await;

        // A concurrent fetch for this key may have landed while we waited.
        if let Some(v) = self.get(&key) {
            return Ok(v);
        }

        let fetched = fetch().await;
        if let Ok(value) = &fetched {
            self.entries.insert(
                key.clone(),
                CacheEntry {
                    value: value.clone(),
                    fetched_at: Instant::now(),
                },
            );
        }

        drop(guard);
        // Drop the gate once no other task is waiting on it; `gate` plus the
        // map's own Arc account for two strong references.
        self.inflight
            .remove_if(&key, |_, g| Arc::strong_count(g) <= 2);

        fetched
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
