use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

struct CacheValue<V> {
    value: V,
    fetched_at: DateTime<Utc>,
}

/// In-memory cache with lazy TTL checks and an optional FIFO capacity bound.
///
/// Entries keep their original insertion slot when replaced, so the eviction
/// victim is always the oldest-inserted key still present. Stale entries are
/// never swept; they only stop being returned.
pub struct MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Mutex<IndexMap<K, CacheValue<V>>>>,
    ttl: Duration,
    capacity: Option<usize>,
}

impl<K, V> MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync + Debug,
    V: Clone + Send + Sync,
{
    pub fn new(ttl: Duration, capacity: Option<usize>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(IndexMap::new())),
            ttl,
            capacity,
        }
    }

    /// Returns the value for `key` if it was fetched less than one TTL before
    /// `now` and `accept` agrees with it.
    pub async fn get_fresh_if(
        &self,
        key: &K,
        now: DateTime<Utc>,
        accept: impl FnOnce(&V) -> bool,
    ) -> Option<V> {
        let cache = self.inner.lock().await;
        let Some(entry) = cache.get(key) else {
            debug!("Cache MISS for key: {:?}", key);
            return None;
        };
        if !is_fresh(entry.fetched_at, now, self.ttl) {
            debug!("Cache entry stale for key: {:?}", key);
            return None;
        }
        if !accept(&entry.value) {
            debug!("Cache entry rejected for key: {:?}", key);
            return None;
        }
        debug!("Cache HIT for key: {:?}", key);
        Some(entry.value.clone())
    }

    pub async fn get_fresh(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        self.get_fresh_if(key, now, |_| true).await
    }

    /// Inserts or replaces `key`. Returns the key evicted to make room, if any.
    ///
    /// The capacity check, eviction and insertion happen under one lock.
    pub async fn put(&self, key: K, value: V, fetched_at: DateTime<Utc>) -> Option<K> {
        let mut cache = self.inner.lock().await;
        let mut evicted = None;

        if !cache.contains_key(&key) {
            match self.capacity {
                Some(0) => {
                    debug!("Cache has zero capacity, dropping key: {:?}", key);
                    return None;
                }
                Some(capacity) if cache.len() >= capacity => {
                    evicted = cache.shift_remove_index(0).map(|(oldest, _)| oldest);
                    debug!("Cache EVICT for key: {:?}", evicted);
                }
                _ => {}
            }
        }

        debug!("Cache PUT for key: {:?}", key);
        cache.insert(key, CacheValue { value, fetched_at });
        evicted
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    pub async fn contains_key(&self, key: &K) -> bool {
        self.inner.lock().await.contains_key(key)
    }
}

/// Entries stamped in the future (clock moved backwards) count as fresh.
fn is_fresh(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    (now - fetched_at).to_std().map_or(true, |age| age < ttl)
}
