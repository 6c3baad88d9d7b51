//! Shared utilities for probecache
//!
//! Filesystem primitives used by the snapshot protocol, tracing setup for
//! host binaries, and XDG path resolution.

pub mod lock_file;
pub mod tracing;
pub mod xdg;

pub use lock_file::*;
pub use xdg::*;
