//! Failure values kept by the negative-result cache

use serde::{Deserialize, Serialize};

/// A lookup failure worth remembering.
///
/// Once recorded for a name, the failure is handed back on every later
/// lookup of that name without repeating the probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LookupFailure {
    /// The resource does not exist anywhere on the search path
    #[error("resource '{name}' not found")]
    NotFound { name: String },

    /// The resource name can never resolve, whatever the search path holds
    #[error("resource '{name}' cannot be resolved: {reason}")]
    Unresolvable { name: String, reason: String },
}

impl LookupFailure {
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    #[must_use]
    pub fn unresolvable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unresolvable {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Name of the resource that failed
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::NotFound { name } | Self::Unresolvable { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            LookupFailure::not_found("missing/Foo").to_string(),
            "resource 'missing/Foo' not found"
        );
        assert_eq!(
            LookupFailure::unresolvable("../x", "escapes search path").to_string(),
            "resource '../x' cannot be resolved: escapes search path"
        );
    }

    #[test]
    fn test_name() {
        assert_eq!(LookupFailure::unresolvable("a", "b").name(), "a");
    }
}
