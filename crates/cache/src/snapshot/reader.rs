//! Startup load of a snapshot into a fingerprint-indexed table

use super::format::SnapshotLine;
use crate::errors::{CacheError, FormatViolation, RecoveryHint, Result};
use crate::store::LoadedBucket;
use probecache_core::{FingerprintKey, LoadedEntry};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recovered buckets keyed by the fingerprint that wrote them
pub type LoadTable = HashMap<FingerprintKey, Arc<LoadedBucket>>;

/// Parses a snapshot in one pass.
///
/// Any malformed line or read error aborts the whole load; a partially
/// loaded table is never returned.
pub struct SnapshotReader {
    path: PathBuf,
    table: LoadTable,
    current: Option<(FingerprintKey, HashMap<String, LoadedEntry>)>,
    entries: usize,
}

impl SnapshotReader {
    /// Read and parse the snapshot at `path`
    pub fn load(path: &Path) -> Result<LoadTable> {
        let _span = probecache_utils::tracing::snapshot_span("load", path).entered();

        let file = File::open(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            operation: "open snapshot",
            source: e,
            recovery_hint: RecoveryHint::CheckPermissions {
                path: path.to_path_buf(),
            },
        })?;

        let mut reader = Self::new(path);
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| CacheError::Io {
                path: path.to_path_buf(),
                operation: "read snapshot",
                source: e,
                recovery_hint: RecoveryHint::RemoveSnapshot {
                    path: path.to_path_buf(),
                },
            })?;
            reader.accept(index + 1, &line)?;
        }

        let table = reader.finish();
        tracing::info!(
            path = %path.display(),
            buckets = table.len(),
            "Loaded lookup snapshot"
        );
        Ok(table)
    }

    /// Parse snapshot text already in memory; `origin` labels errors
    pub fn parse_str(origin: &Path, content: &str) -> Result<LoadTable> {
        let mut reader = Self::new(origin);
        for (index, line) in content.lines().enumerate() {
            reader.accept(index + 1, line)?;
        }
        Ok(reader.finish())
    }

    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            table: HashMap::new(),
            current: None,
            entries: 0,
        }
    }

    fn accept(&mut self, line_number: usize, line: &str) -> Result<()> {
        let parsed = SnapshotLine::parse(line)
            .map_err(|violation| self.format_error(line_number, line, violation))?;

        match parsed {
            SnapshotLine::Header(fingerprint) => {
                self.close_bucket();
                self.current = Some((fingerprint, HashMap::new()));
            }
            SnapshotLine::Entry { name, entry } => match self.current.as_mut() {
                Some((_, entries)) => {
                    entries.insert(name, entry);
                    self.entries += 1;
                }
                None => {
                    return Err(self.format_error(
                        line_number,
                        line,
                        FormatViolation::EntryBeforeHeader,
                    ))
                }
            },
        }
        Ok(())
    }

    fn close_bucket(&mut self) {
        if let Some((fingerprint, entries)) = self.current.take() {
            let bucket = Arc::new(LoadedBucket::new(fingerprint.clone(), entries));
            if self.table.insert(fingerprint, bucket).is_some() {
                tracing::debug!(
                    path = %self.path.display(),
                    "Duplicate snapshot bucket replaced an earlier one"
                );
            }
        }
    }

    fn finish(mut self) -> LoadTable {
        self.close_bucket();
        tracing::debug!(
            path = %self.path.display(),
            buckets = self.table.len(),
            entries = self.entries,
            "Parsed snapshot"
        );
        self.table
    }

    fn format_error(&self, line_number: usize, line: &str, violation: FormatViolation) -> CacheError {
        CacheError::Format {
            path: self.path.clone(),
            line_number,
            line: line.to_string(),
            violation,
            recovery_hint: RecoveryHint::RemoveSnapshot {
                path: self.path.clone(),
            },
        }
    }
}
