//! Process-wide cache state with an explicit lifecycle
//!
//! A host creates one `Registry` at startup with [`Registry::initialize`],
//! passes it to every [`CacheStore::create`](crate::store::CacheStore::create)
//! call, and calls [`Registry::shutdown`] from its orderly exit path.

use crate::config::CacheConfig;
use crate::errors::Result;
use crate::snapshot::{DumpOutcome, LoadTable, SnapshotReader, SnapshotWriter};
use crate::store::{CacheStore, LoadedBucket};
use parking_lot::{Mutex, MutexGuard};
use probecache_core::FingerprintKey;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Stores to dump at shutdown plus buckets recovered at startup
pub struct Registry {
    config: CacheConfig,
    capacity: NonZeroUsize,
    dump_list: Mutex<Vec<Arc<CacheStore>>>,
    load_table: LoadTable,
    shut_down: AtomicBool,
}

impl Registry {
    /// Validate `config` and, if loading is enabled, read the snapshot.
    ///
    /// Returns `None` when the cache is disabled: nothing should be wrapped
    /// in that case. A configuration contradiction or an unreadable snapshot
    /// is returned as an error for the host to treat as fatal.
    pub fn initialize(config: CacheConfig) -> Result<Option<Self>> {
        config.validate()?;
        if !config.enabled {
            tracing::debug!("Lookup cache disabled");
            return Ok(None);
        }

        let capacity = config.capacity()?;
        let load_table = match &config.load_path {
            Some(path) => SnapshotReader::load(path)?,
            None => LoadTable::new(),
        };

        tracing::debug!(
            max_entries = capacity.get(),
            dump = config.dump_enabled(),
            load = config.load_enabled(),
            buckets = load_table.len(),
            "Initialized lookup cache registry"
        );

        Ok(Some(Self {
            config,
            capacity,
            dump_list: Mutex::new(Vec::new()),
            load_table,
            shut_down: AtomicBool::new(false),
        }))
    }

    /// Dump every registered store if dumping is enabled.
    ///
    /// Only the first call does anything; later calls return `None`.
    pub fn shutdown(&self) -> Option<DumpOutcome> {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return None;
        }
        let path = self.config.dump_path.as_deref()?;
        Some(SnapshotWriter::dump(path, self))
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    pub fn dump_enabled(&self) -> bool {
        self.config.dump_enabled()
    }

    /// Bucket recovered for exactly this fingerprint
    pub fn loaded_bucket(&self, fingerprint: &FingerprintKey) -> Option<Arc<LoadedBucket>> {
        self.load_table.get(fingerprint).cloned()
    }

    pub fn load_table(&self) -> &LoadTable {
        &self.load_table
    }

    /// Number of stores queued for the shutdown dump
    pub fn store_count(&self) -> usize {
        self.dump_list.lock().len()
    }

    pub(crate) fn register(&self, store: Arc<CacheStore>) {
        self.dump_list.lock().push(store);
    }

    pub(crate) fn lock_dump_list(&self) -> MutexGuard<'_, Vec<Arc<CacheStore>>> {
        self.dump_list.lock()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("stores", &self.store_count())
            .field("buckets", &self.load_table.len())
            .finish()
    }
}
