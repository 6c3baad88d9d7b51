//! Identity of one search-path owner, stable from run to run

use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh3::xxh3_64;

/// Identifies the bucket a search-path owner reads from and writes to.
///
/// Two owners with the same type name, instance name and search-path hash
/// share a bucket across process restarts. The hash is deliberately weak
/// (see [`search_path_hash`]); collisions are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FingerprintKey {
    owner_type_name: String,
    owner_instance_name: Option<String>,
    search_path_hash: i32,
}

impl FingerprintKey {
    #[must_use]
    pub fn new(
        owner_type_name: impl Into<String>,
        owner_instance_name: Option<String>,
        search_path_hash: i32,
    ) -> Self {
        Self {
            owner_type_name: owner_type_name.into(),
            owner_instance_name,
            search_path_hash,
        }
    }

    /// Build a key by hashing the owner's ordered search path
    #[must_use]
    pub fn for_search_path<S: AsRef<str>>(
        owner_type_name: impl Into<String>,
        owner_instance_name: Option<String>,
        search_path: &[S],
    ) -> Self {
        Self::new(
            owner_type_name,
            owner_instance_name,
            search_path_hash(search_path),
        )
    }

    #[must_use]
    pub fn owner_type_name(&self) -> &str {
        &self.owner_type_name
    }

    #[must_use]
    pub fn owner_instance_name(&self) -> Option<&str> {
        self.owner_instance_name.as_deref()
    }

    #[must_use]
    pub fn search_path_hash(&self) -> i32 {
        self.search_path_hash
    }
}

impl fmt::Display for FingerprintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner_instance_name {
            Some(name) => write!(
                f,
                "{}({name})#{}",
                self.owner_type_name, self.search_path_hash
            ),
            None => write!(f, "{}#{}", self.owner_type_name, self.search_path_hash),
        }
    }
}

/// Entry count XOR a hash of the first entry.
///
/// Only the first entry contributes content, so two search paths of equal
/// length that share a first entry collide.
#[must_use]
pub fn search_path_hash<S: AsRef<str>>(search_path: &[S]) -> i32 {
    let first = search_path
        .first()
        .map(|entry| {
            let h = xxh3_64(entry.as_ref().as_bytes());
            ((h as u32) ^ ((h >> 32) as u32)) as i32
        })
        .unwrap_or(0);
    (search_path.len() as i32) ^ first
}
