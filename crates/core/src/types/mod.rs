//! Value types shared across the workspace

mod entry;
mod failure;
mod fingerprint;

pub use entry::{CacheEntry, LoadedEntry};
pub use failure::LookupFailure;
pub use fingerprint::{search_path_hash, FingerprintKey};
