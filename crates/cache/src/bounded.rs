//! Size-bounded, thread-safe LRU map keyed by resource name
//!
//! Both `get` and `put` count as an access. Inserting a new name into a full
//! cache evicts the least recently accessed entry inside the same critical
//! section, so `len() <= capacity()` holds at every point another thread can
//! observe.

use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Access counters with atomic updates
#[derive(Debug, Default)]
pub struct CacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub inserts: AtomicU64,
    pub evictions: AtomicU64,
}

impl CacheStats {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStatistics {
        CacheStatistics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatistics {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
}

impl CacheStatistics {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU map from resource name to `V`, bounded by entry count
pub struct BoundedCache<V> {
    entries: Mutex<LruCache<String, V>>,
    stats: CacheStats,
}

impl<V: Clone> BoundedCache<V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            stats: CacheStats::default(),
        }
    }

    /// Look up `name`, marking it most recently used
    pub fn get(&self, name: &str) -> Option<V> {
        let value = self.entries.lock().get(name).cloned();
        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    /// Insert or replace `name`, evicting the least recently used entry if full
    pub fn put(&self, name: impl Into<String>, value: V) {
        let name = name.into();
        let mut entries = self.entries.lock();
        let evicts = entries.len() == entries.cap().get() && !entries.contains(name.as_str());
        entries.put(name, value);
        drop(entries);

        self.stats.record_insert();
        if evicts {
            self.stats.record_eviction();
        }
    }

    /// Whether `name` is present, without touching recency
    pub fn contains(&self, name: &str) -> bool {
        self.entries.lock().contains(name)
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.entries.lock().cap()
    }

    pub fn stats(&self) -> CacheStatistics {
        self.stats.snapshot()
    }

    /// Visit every entry, least recently used first, holding the lock
    /// throughout. Recency is not updated. Stops at the first error.
    pub fn try_for_each<E, F>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&str, &V) -> Result<(), E>,
    {
        let entries = self.entries.lock();
        for (name, value) in entries.iter().rev() {
            f(name.as_str(), value)?;
        }
        Ok(())
    }
}

impl<V> std::fmt::Debug for BoundedCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("BoundedCache")
            .field("len", &entries.len())
            .field("capacity", &entries.cap())
            .finish()
    }
}
