//! Lookup cache for probecache
//!
//! Memoizes "where on this search path does resource X live" answers:
//! - Bounded, thread-safe LRU tiers for answers and failures
//! - A recovered tier seeded from the previous run's snapshot
//! - An atomic, lock-file protected snapshot dump at shutdown
//! - Fingerprint matching so buckets only reach the owner that wrote them

pub mod bounded;
pub mod config;
pub mod errors;
pub mod probe;
pub mod registry;
pub mod snapshot;
pub mod store;

pub use bounded::{BoundedCache, CacheStatistics};
pub use config::{
    CacheConfig, CacheConfigBuilder, CacheConfigLoader, CacheConfigOverrides, CacheConfiguration,
    ConfigSource,
};
pub use errors::{CacheError, Error, FormatViolation, RecoveryHint, Result};
pub use probe::ResourceProbe;
pub use registry::Registry;
pub use snapshot::{DumpOutcome, LoadTable, SnapshotReader, SnapshotWriter};
pub use store::{CacheStore, LoadedBucket, NegativeLookupRecord, StoreStatistics};

pub use probecache_core::{CacheEntry, FingerprintKey, LoadedEntry, LookupFailure, NOT_FOUND};
