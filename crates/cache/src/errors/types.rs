//! Core error types for the cache system

use std::path::PathBuf;

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Re-export CacheError as Error for convenience
pub use CacheError as Error;

/// `CacheError::Io` operations raised while dumping a snapshot
pub const WRITE_SNAPSHOT: &str = "write snapshot";
pub const FLUSH_SNAPSHOT: &str = "flush snapshot";
pub const PERSIST_SNAPSHOT: &str = "persist snapshot";

/// Error type for cache lifecycle and snapshot operations
#[derive(Debug)]
pub enum CacheError {
    /// I/O errors while reading or writing a snapshot
    Io {
        path: PathBuf,
        operation: &'static str,
        source: std::io::Error,
        recovery_hint: RecoveryHint,
    },

    /// Malformed snapshot content
    Format {
        path: PathBuf,
        line_number: usize,
        line: String,
        violation: FormatViolation,
        recovery_hint: RecoveryHint,
    },

    /// Contradictory or invalid configuration
    Configuration {
        message: String,
        recovery_hint: RecoveryHint,
    },
}

/// What was wrong with a snapshot line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatViolation {
    /// The line starts with neither `L|` nor `E|`
    UnknownPrefix,
    /// An entry line appeared before any header line
    EntryBeforeHeader,
    /// Wrong number of `|`-separated fields
    FieldCount {
        kind: LineKind,
        expected: &'static str,
        found: usize,
    },
    /// A numeric field did not parse as a 32-bit integer
    InvalidInteger { field: &'static str, value: String },
    /// A not-found entry carried a location token
    TokenOnNegativeEntry,
}

/// The two line kinds of the snapshot format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Header,
    Entry,
}

/// Recovery hints for error handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryHint {
    /// Check file permissions
    CheckPermissions { path: PathBuf },

    /// Delete the snapshot so the next run writes a fresh one
    RemoveSnapshot { path: PathBuf },

    /// Update cache configuration
    UpdateConfiguration,

    /// No automated recovery possible
    Manual { instructions: String },
}
