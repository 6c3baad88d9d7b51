//! On-disk snapshot of every live store
//!
//! The format is line oriented, UTF-8 and `|` delimited:
//!
//! ```text
//! L|<ownerTypeName>|<ownerInstanceName or "<null>">|<searchPathHash>
//! E|<resourceName>|<index>
//! E|<resourceName>|<index>|<locationToken>
//! ```
//!
//! An `L` line opens a bucket that collects every following `E` line until
//! the next `L` line or end of file. Index `-1` means "not found" and never
//! carries a token; tokens are only written in verbose mode.

mod format;
mod reader;
mod writer;

pub use format::{lock_path_for, SnapshotLine};
pub use reader::{LoadTable, SnapshotReader};
pub use writer::{DumpOutcome, SnapshotWriter};
