//! Boundary to the external resource-probing algorithm

use probecache_core::{CacheEntry, LoadedEntry, LookupFailure};

/// Finds a named resource on a search path.
///
/// The cache never looks inside a probe; it only memoizes what `probe`
/// returns. `Ok` with a not-found entry is a definitive negative answer and
/// is cached in the positive tier; `Err` is a failure and goes to the
/// negative tier.
pub trait ResourceProbe {
    /// Run the real, expensive lookup; the entry must be named `name`
    fn probe(&self, name: &str) -> Result<CacheEntry, LookupFailure>;

    /// Turn an answer recovered from a snapshot back into a live entry.
    ///
    /// Returning `None` makes the caller fall back to [`probe`](Self::probe).
    /// The default revives negative answers, which need no location, and
    /// re-probes everything else.
    fn restore(&self, name: &str, loaded: &LoadedEntry) -> Option<CacheEntry> {
        if loaded.is_found() {
            None
        } else {
            Some(CacheEntry::not_found(name))
        }
    }
}

impl<F> ResourceProbe for F
where
    F: Fn(&str) -> Result<CacheEntry, LookupFailure>,
{
    fn probe(&self, name: &str) -> Result<CacheEntry, LookupFailure> {
        self(name)
    }
}
