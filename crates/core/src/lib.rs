//! Core domain types, errors, and constants for `probecache`.
//!
//! This crate holds the value objects shared by every other crate in the
//! workspace. None of them carry behaviour beyond construction and equality,
//! so they can be created and discarded freely.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum and `Result` alias used by the filesystem
//!   helpers in `probecache-utils`.
//! - **`types`**: `FingerprintKey`, `CacheEntry`, `LoadedEntry` and the cached
//!   failure value `LookupFailure`.
//! - **`constants`**: snapshot format tokens and configuration defaults.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    types::*,
};
