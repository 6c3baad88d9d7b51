//! Shutdown dump of every registered store
//!
//! The protocol never overwrites an existing snapshot and never fails the
//! caller. Mutual exclusion between concurrent writers, in this process or
//! another, rests solely on exclusive creation of the `.tmp` lock file.

use super::format::{
    entry_is_persistable, header_is_persistable, lock_path_for, render_entry, render_header,
};
use crate::errors::{CacheError, RecoveryHint, FLUSH_SNAPSHOT, WRITE_SNAPSHOT};
use crate::registry::Registry;
use crate::store::CacheStore;
use probecache_utils::{LockFile, Persisted};
use serde::{Deserialize, Serialize};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

/// What a dump attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DumpOutcome {
    /// A new snapshot was written
    Written { stores: usize, entries: usize },
    /// A snapshot already existed; nothing was written
    AlreadyExists,
    /// Another writer holds the lock file
    Contended,
    /// An I/O error abandoned the dump
    Failed,
}

/// Serializes the registry's dump list to a snapshot file
pub struct SnapshotWriter;

impl SnapshotWriter {
    /// Write a snapshot of every store registered with `registry` to `path`
    pub fn dump(path: &Path, registry: &Registry) -> DumpOutcome {
        let _span = probecache_utils::tracing::snapshot_span("dump", path).entered();

        if path.exists() {
            tracing::debug!(path = %path.display(), "Snapshot already exists, skipping dump");
            return DumpOutcome::AlreadyExists;
        }

        let lock_path = lock_path_for(path);
        let lock = match LockFile::create_exclusive(&lock_path) {
            Ok(lock) => lock,
            Err(e) if e.io_kind() == Some(io::ErrorKind::AlreadyExists) => {
                tracing::debug!(
                    lock = %lock_path.display(),
                    "Another writer holds the snapshot lock"
                );
                return DumpOutcome::Contended;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not create snapshot lock file");
                return DumpOutcome::Failed;
            }
        };

        // The snapshot may have appeared while we were taking the lock
        if path.exists() {
            tracing::debug!(path = %path.display(), "Snapshot appeared while locking");
            return DumpOutcome::AlreadyExists;
        }

        match Self::write_and_persist(lock, path, registry) {
            Ok(outcome) => {
                if let DumpOutcome::Written { stores, entries } = outcome {
                    tracing::info!(
                        path = %path.display(),
                        stores,
                        entries,
                        "Wrote lookup snapshot"
                    );
                }
                outcome
            }
            Err(e) => {
                tracing::warn!(error = %e, "Abandoned lookup snapshot dump");
                DumpOutcome::Failed
            }
        }
    }

    fn write_and_persist(
        lock: LockFile,
        path: &Path,
        registry: &Registry,
    ) -> Result<DumpOutcome, CacheError> {
        let lock_path = lock.path().to_path_buf();
        let io_error = |operation: &'static str, source: io::Error| CacheError::Io {
            path: lock_path.clone(),
            operation,
            source,
            recovery_hint: RecoveryHint::CheckPermissions {
                path: lock_path.clone(),
            },
        };

        let verbose = registry.config().verbose;
        let mut out = BufWriter::new(lock);
        let mut stores = 0;
        let mut entries = 0;
        {
            // Held across the whole iteration so registration cannot interleave
            let dump_list = registry.lock_dump_list();
            for store in dump_list.iter() {
                match Self::write_store(&mut out, store, verbose) {
                    Ok(Some(written)) => {
                        stores += 1;
                        entries += written;
                    }
                    Ok(None) => {}
                    Err(e) => return Err(io_error(WRITE_SNAPSHOT, e)),
                }
            }
        }

        let lock = out
            .into_inner()
            .map_err(|e| io_error(FLUSH_SNAPSHOT, e.into_error()))?;

        match lock.persist_noclobber(path)? {
            Persisted::Renamed => Ok(DumpOutcome::Written { stores, entries }),
            Persisted::TargetExists => {
                tracing::debug!(path = %path.display(), "Snapshot appeared before rename");
                Ok(DumpOutcome::AlreadyExists)
            }
        }
    }

    /// Write one bucket; `None` if the store cannot be represented
    fn write_store<W: Write>(
        out: &mut W,
        store: &Arc<CacheStore>,
        verbose: bool,
    ) -> io::Result<Option<usize>> {
        let fingerprint = store.fingerprint();
        if !header_is_persistable(fingerprint) {
            tracing::debug!(fingerprint = %fingerprint, "Skipping store with unrepresentable fingerprint");
            return Ok(None);
        }

        writeln!(out, "{}", render_header(fingerprint))?;

        let mut written = 0;
        store.try_for_each_entry(|name, entry| -> io::Result<()> {
            if !entry_is_persistable(name, entry, verbose) {
                tracing::debug!(name, "Skipping entry containing a delimiter");
                return Ok(());
            }
            writeln!(out, "{}", render_entry(name, entry, verbose))?;
            written += 1;
            Ok(())
        })?;

        Ok(Some(written))
    }
}
