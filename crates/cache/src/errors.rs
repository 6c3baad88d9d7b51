//! Error handling for the lookup cache
//!
//! Store bookkeeping never fails. Everything fallible sits at the two file
//! boundaries (snapshot load and dump) and at configuration time, and each
//! error carries a recovery hint for the host to act on.

mod conversions;
mod display;
mod recovery;
mod types;

pub use types::*;
