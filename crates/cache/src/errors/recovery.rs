//! Recovery utilities for cache errors

use super::types::{CacheError, RecoveryHint, FLUSH_SNAPSHOT, PERSIST_SNAPSHOT, WRITE_SNAPSHOT};

impl CacheError {
    /// Get the recovery hint for this error
    #[must_use]
    pub const fn recovery_hint(&self) -> &RecoveryHint {
        match self {
            Self::Io { recovery_hint, .. }
            | Self::Format { recovery_hint, .. }
            | Self::Configuration { recovery_hint, .. } => recovery_hint,
        }
    }

    /// Check if this error indicates a corrupt snapshot
    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// Whether the host should stop rather than continue without a cache.
    ///
    /// Configuration contradictions and anything that broke a snapshot load
    /// are fatal. I/O failures while dumping only lose the snapshot.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Io { operation, .. } => {
                ![WRITE_SNAPSHOT, FLUSH_SNAPSHOT, PERSIST_SNAPSHOT].contains(operation)
            }
            Self::Format { .. } | Self::Configuration { .. } => true,
        }
    }

    /// Process exit status a host binary should use for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration { .. } => 2,
            Self::Io { .. } | Self::Format { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FormatViolation;
    use std::path::PathBuf;

    #[test]
    fn test_configuration_error_exit_code() {
        let err = CacheError::Configuration {
            message: "dump path set while disabled".to_string(),
            recovery_hint: RecoveryHint::UpdateConfiguration,
        };
        assert!(!err.is_corruption());
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_load_errors_are_fatal_dump_errors_are_not() {
        let io = |operation| CacheError::Io {
            path: PathBuf::from("s"),
            operation,
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            recovery_hint: RecoveryHint::CheckPermissions {
                path: PathBuf::from("s"),
            },
        };
        assert!(io("open snapshot").is_fatal());
        assert!(io("read snapshot").is_fatal());
        assert!(!io(WRITE_SNAPSHOT).is_fatal());
        assert!(!io(FLUSH_SNAPSHOT).is_fatal());
        assert!(!io(PERSIST_SNAPSHOT).is_fatal());

        let config = CacheError::Configuration {
            message: "max_entries must be greater than zero".to_string(),
            recovery_hint: RecoveryHint::UpdateConfiguration,
        };
        assert!(config.is_fatal());
    }

    #[test]
    fn test_format_error_is_corruption() {
        let err = CacheError::Format {
            path: PathBuf::from("s"),
            line_number: 3,
            line: "E|x".to_string(),
            violation: FormatViolation::EntryBeforeHeader,
            recovery_hint: RecoveryHint::RemoveSnapshot {
                path: PathBuf::from("s"),
            },
        };
        assert!(err.is_corruption());
        assert!(err.is_fatal());
        assert_eq!(err.exit_code(), 1);
    }
}
