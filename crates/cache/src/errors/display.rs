//! Display implementations for cache errors

use super::types::{CacheError, FormatViolation, LineKind, RecoveryHint};
use std::fmt;

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path,
                operation,
                source,
                ..
            } => write!(
                f,
                "I/O error during {} on '{}': {}",
                operation,
                path.display(),
                source
            ),
            Self::Format {
                path,
                line_number,
                line,
                violation,
                ..
            } => write!(
                f,
                "Malformed snapshot '{}' at line {line_number}: {violation} (line: {line:?})",
                path.display()
            ),
            Self::Configuration { message, .. } => {
                write!(f, "Cache configuration error: {message}")
            }
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Format { .. } | Self::Configuration { .. } => None,
        }
    }
}

impl fmt::Display for FormatViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPrefix => write!(f, "line does not start with 'L|' or 'E|'"),
            Self::EntryBeforeHeader => write!(f, "entry line before any header line"),
            Self::FieldCount {
                kind,
                expected,
                found,
            } => write!(f, "{kind} line has {found} fields, expected {expected}"),
            Self::InvalidInteger { field, value } => {
                write!(f, "{field} '{value}' is not a 32-bit integer")
            }
            Self::TokenOnNegativeEntry => {
                write!(f, "not-found entry carries a location token")
            }
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Entry => write!(f, "entry"),
        }
    }
}

impl fmt::Display for RecoveryHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckPermissions { path } => {
                write!(f, "check permissions on '{}'", path.display())
            }
            Self::RemoveSnapshot { path } => write!(
                f,
                "remove '{}' and let the next run write a fresh snapshot",
                path.display()
            ),
            Self::UpdateConfiguration => write!(f, "update the cache configuration"),
            Self::Manual { instructions } => write!(f, "{instructions}"),
        }
    }
}
