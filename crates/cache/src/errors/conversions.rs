//! Error conversion utilities

use super::types::{CacheError, RecoveryHint, PERSIST_SNAPSHOT};
use std::path::PathBuf;

impl From<std::io::Error> for CacheError {
    fn from(error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        let recovery_hint = match error.kind() {
            ErrorKind::PermissionDenied => RecoveryHint::CheckPermissions {
                path: PathBuf::from("."),
            },
            _ => RecoveryHint::Manual {
                instructions: "Check that the snapshot path is reachable".to_string(),
            },
        };

        Self::Io {
            path: PathBuf::from("."),
            operation: "unknown",
            source: error,
            recovery_hint,
        }
    }
}

/// Convert config file parse errors to cache errors
impl From<serde_json::Error> for CacheError {
    fn from(error: serde_json::Error) -> Self {
        Self::Configuration {
            message: format!("invalid configuration file: {error}"),
            recovery_hint: RecoveryHint::Manual {
                instructions: "Check JSON format and data types".to_string(),
            },
        }
    }
}

/// Convert core errors (from the filesystem helpers) to cache errors
impl From<probecache_core::Error> for CacheError {
    fn from(error: probecache_core::Error) -> Self {
        match error {
            probecache_core::Error::FileSystem {
                path,
                operation: _,
                source,
            } => Self::Io {
                recovery_hint: RecoveryHint::CheckPermissions { path: path.clone() },
                path,
                operation: PERSIST_SNAPSHOT,
                source,
            },
            probecache_core::Error::Configuration { message } => Self::Configuration {
                message,
                recovery_hint: RecoveryHint::UpdateConfiguration,
            },
        }
    }
}
