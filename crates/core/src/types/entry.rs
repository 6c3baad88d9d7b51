//! Cached lookup answers

use crate::constants::NOT_FOUND;
use serde::{Deserialize, Serialize};

/// An answer computed in this process.
///
/// A negative answer always carries [`NOT_FOUND`] as its index and no
/// location token; the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    name: String,
    found: bool,
    location_token: Option<String>,
    index: i32,
}

impl CacheEntry {
    /// A positive answer: `name` lives in search-path entry `index`.
    ///
    /// An index of [`NOT_FOUND`] yields a negative answer and drops the token.
    #[must_use]
    pub fn found(name: impl Into<String>, index: i32, location_token: Option<String>) -> Self {
        if index == NOT_FOUND {
            return Self::not_found(name);
        }
        Self {
            name: name.into(),
            found: true,
            location_token,
            index,
        }
    }

    /// A definitive negative answer
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            found: false,
            location_token: None,
            index: NOT_FOUND,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        self.found
    }

    #[must_use]
    pub fn location_token(&self) -> Option<&str> {
        self.location_token.as_deref()
    }

    #[must_use]
    pub fn index(&self) -> i32 {
        self.index
    }
}

/// An answer recovered from a previous process's snapshot.
///
/// The location token is only a string; turning it back into a live
/// location is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedEntry {
    index: i32,
    location_token: Option<String>,
}

impl LoadedEntry {
    #[must_use]
    pub fn new(index: i32, location_token: Option<String>) -> Self {
        if index == NOT_FOUND {
            return Self::not_found();
        }
        Self {
            index,
            location_token,
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self {
            index: NOT_FOUND,
            location_token: None,
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        self.index != NOT_FOUND
    }

    #[must_use]
    pub fn index(&self) -> i32 {
        self.index
    }

    #[must_use]
    pub fn location_token(&self) -> Option<&str> {
        self.location_token.as_deref()
    }
}

impl From<&CacheEntry> for LoadedEntry {
    fn from(entry: &CacheEntry) -> Self {
        Self::new(entry.index, entry.location_token.clone())
    }
}
