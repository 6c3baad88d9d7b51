//! Per-owner cache: two bounded in-memory tiers plus a recovered snapshot tier

use crate::bounded::{BoundedCache, CacheStatistics};
use crate::probe::ResourceProbe;
use crate::registry::Registry;
use probecache_core::{CacheEntry, FingerprintKey, LoadedEntry, LookupFailure};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Entries recovered from a snapshot under one fingerprint.
///
/// Built once by the snapshot reader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedBucket {
    fingerprint: FingerprintKey,
    entries: HashMap<String, LoadedEntry>,
}

impl LoadedBucket {
    pub fn new(fingerprint: FingerprintKey, entries: HashMap<String, LoadedEntry>) -> Self {
        Self {
            fingerprint,
            entries,
        }
    }

    pub fn empty(fingerprint: FingerprintKey) -> Self {
        Self::new(fingerprint, HashMap::new())
    }

    pub fn fingerprint(&self) -> &FingerprintKey {
        &self.fingerprint
    }

    pub fn get(&self, name: &str) -> Option<&LoadedEntry> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> &HashMap<String, LoadedEntry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A cached failure for one resource name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegativeLookupRecord {
    pub name: String,
    pub cached_failure: LookupFailure,
}

/// Counters for both in-memory tiers of a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatistics {
    pub entries: CacheStatistics,
    pub failures: CacheStatistics,
    pub live_entries: usize,
    pub live_failures: usize,
    pub loaded_entries: usize,
}

/// Lookup cache for one search-path owner.
///
/// Callers check [`raise_if_cached_failure`](Self::raise_if_cached_failure)
/// before probing, then [`lookup`](Self::lookup), then optionally
/// [`loaded_lookup`](Self::loaded_lookup), and finally record what the real
/// probe produced. [`resolve`](Self::resolve) runs that whole protocol.
#[derive(Debug)]
pub struct CacheStore {
    fingerprint: FingerprintKey,
    entries: BoundedCache<CacheEntry>,
    failures: BoundedCache<NegativeLookupRecord>,
    loaded: Arc<LoadedBucket>,
}

impl CacheStore {
    /// Create the store for `fingerprint`, seeding it from the registry's
    /// load table and registering it for the shutdown dump.
    pub fn create(fingerprint: FingerprintKey, registry: &Registry) -> Arc<Self> {
        let loaded = registry
            .loaded_bucket(&fingerprint)
            .unwrap_or_else(|| Arc::new(LoadedBucket::empty(fingerprint.clone())));

        if !loaded.is_empty() {
            tracing::debug!(
                fingerprint = %fingerprint,
                entries = loaded.len(),
                "Bound store to recovered snapshot bucket"
            );
        }

        let store = Arc::new(Self::new(fingerprint, registry.capacity(), loaded));
        if registry.dump_enabled() {
            registry.register(Arc::clone(&store));
        }
        store
    }

    /// A store outside any registry, never persisted
    pub fn new(
        fingerprint: FingerprintKey,
        capacity: NonZeroUsize,
        loaded: Arc<LoadedBucket>,
    ) -> Self {
        Self {
            fingerprint,
            entries: BoundedCache::new(capacity),
            failures: BoundedCache::new(capacity),
            loaded,
        }
    }

    pub fn fingerprint(&self) -> &FingerprintKey {
        &self.fingerprint
    }

    /// Answer computed earlier in this process
    pub fn lookup(&self, name: &str) -> Option<CacheEntry> {
        self.entries.get(name)
    }

    /// Answer recovered from a previous process, if any
    pub fn loaded_lookup(&self, name: &str) -> Option<&LoadedEntry> {
        self.loaded.get(name)
    }

    pub fn loaded_bucket(&self) -> &LoadedBucket {
        &self.loaded
    }

    /// Remember a freshly computed answer; `name` must be `entry.name()`
    pub fn record(&self, name: impl Into<String>, entry: CacheEntry) {
        let name = name.into();
        debug_assert_eq!(name, entry.name(), "cache key differs from entry name");
        self.entries.put(name, entry);
    }

    /// Remember that probing `name` failed
    pub fn record_failure(&self, name: impl Into<String>, failure: LookupFailure) {
        let name = name.into();
        let record = NegativeLookupRecord {
            name: name.clone(),
            cached_failure: failure,
        };
        self.failures.put(name, record);
    }

    /// Fail with the cached failure for `name`, if one is on record
    pub fn raise_if_cached_failure(&self, name: &str) -> Result<(), LookupFailure> {
        match self.failures.get(name) {
            Some(record) => Err(record.cached_failure),
            None => Ok(()),
        }
    }

    /// Look `name` up through every tier, probing only on a full miss
    pub fn resolve<P>(&self, name: &str, probe: &P) -> Result<CacheEntry, LookupFailure>
    where
        P: ResourceProbe + ?Sized,
    {
        self.raise_if_cached_failure(name)?;

        if let Some(entry) = self.lookup(name) {
            return Ok(entry);
        }

        if let Some(loaded) = self.loaded_lookup(name) {
            if let Some(entry) = probe.restore(name, loaded) {
                self.record(name, entry.clone());
                return Ok(entry);
            }
        }

        match probe.probe(name) {
            Ok(entry) => {
                self.record(name, entry.clone());
                Ok(entry)
            }
            Err(failure) => {
                self.record_failure(name, failure.clone());
                Err(failure)
            }
        }
    }

    /// Drop both in-memory tiers; the recovered tier is immutable
    pub fn clear(&self) {
        self.entries.clear();
        self.failures.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> StoreStatistics {
        StoreStatistics {
            entries: self.entries.stats(),
            failures: self.failures.stats(),
            live_entries: self.entries.len(),
            live_failures: self.failures.len(),
            loaded_entries: self.loaded.len(),
        }
    }

    /// Visit the positive tier under its lock, oldest first
    pub(crate) fn try_for_each_entry<E, F>(&self, f: F) -> Result<(), E>
    where
        F: FnMut(&str, &CacheEntry) -> Result<(), E>,
    {
        self.entries.try_for_each(f)
    }
}
