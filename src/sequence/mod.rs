//! Per-path sequential allocation.
//!
//! Every `(layer, category, subcategory)` path owns one counter. The
//! allocator never caches: each [`SequenceAllocator::next`] reads the
//! store, then publishes `current + 1` with a compare-and-set. Losing the
//! race means someone else took that number, so the loop re-reads and
//! tries again, up to `max_retries` times.
//!
//! ```text
//! current(path) ──► cas(path, n, n+1) ──ok──► Sequential(n+1)
//!        ▲                 │
//!        └────── lost ─────┘   (bounded, then SequenceConflict)
//! ```

mod file;
mod memory;

use std::fmt;

use serde::Serialize;

pub use file::FileCounterStore;
pub use memory::MemoryCounterStore;

use crate::address::Sequential;
use crate::error::{RegistryError, Result};
use crate::taxonomy::ResolvedPath;
use crate::{debug, log};

/// Default bound on compare-and-set attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 16;

// ============================================================================
// PathKey
// ============================================================================

/// Canonical counter key, the alphabetic path `S.POP.HPM`.
///
/// Derived from a resolved path so aliases and numeric input share the
/// counter of their canonical path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PathKey(String);

impl PathKey {
    pub fn new(path: &ResolvedPath) -> Self {
        Self(path.hfn_prefix())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// CounterStore
// ============================================================================

/// Durable counter storage, one integer per path, starting at 0.
pub trait CounterStore: Send + Sync {
    /// Last issued value, 0 when the path has never been used.
    fn current(&self, key: &PathKey) -> Result<u32>;

    /// Atomically replace `expected` with `new`.
    ///
    /// Returns `Ok(false)` when the stored value is not `expected`. A
    /// successful swap must be visible to every later `current` call,
    /// from any process sharing the store, before this returns.
    fn compare_and_set(&self, key: &PathKey, expected: u32, new: u32) -> Result<bool>;

    /// Administrative reset back to 0.
    fn clear(&self, key: &PathKey) -> Result<()>;
}

impl<T: CounterStore + ?Sized> CounterStore for Box<T> {
    fn current(&self, key: &PathKey) -> Result<u32> {
        (**self).current(key)
    }

    fn compare_and_set(&self, key: &PathKey, expected: u32, new: u32) -> Result<bool> {
        (**self).compare_and_set(key, expected, new)
    }

    fn clear(&self, key: &PathKey) -> Result<()> {
        (**self).clear(key)
    }
}

// ============================================================================
// SequenceAllocator
// ============================================================================

#[derive(Debug)]
pub struct SequenceAllocator<S> {
    store: S,
    max_retries: u32,
}

impl<S: CounterStore> SequenceAllocator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Attempts per allocation; values below 1 are raised to 1.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reserve the next sequential for a validated path.
    pub fn next(&self, path: &ResolvedPath) -> Result<Sequential> {
        self.next_for(&PathKey::new(path))
    }

    pub fn next_for(&self, key: &PathKey) -> Result<Sequential> {
        for attempt in 1..=self.max_retries {
            let current = self.store.current(key)?;
            let next = current.checked_add(1).ok_or_else(|| {
                RegistryError::InvalidSequential(format!("counter for {key} is exhausted"))
            })?;

            if self.store.compare_and_set(key, current, next)? {
                return Ok(Sequential::new(next));
            }
            debug!("sequence"; "{} lost race at {} (attempt {}/{})", key, next, attempt, self.max_retries);
        }

        log!("sequence"; "giving up on {} after {} attempts", key, self.max_retries);
        Err(RegistryError::SequenceConflict {
            path: key.to_string(),
            attempts: self.max_retries,
        })
    }

    /// Last issued value without reserving anything.
    pub fn current(&self, path: &ResolvedPath) -> Result<u32> {
        self.store.current(&PathKey::new(path))
    }

    /// Clear a path's counter so numbering starts again at 001.
    ///
    /// Previously issued numbers become issuable again; this is an
    /// administrative operation, not part of normal allocation.
    pub fn reset(&self, path: &ResolvedPath) -> Result<()> {
        let key = PathKey::new(path);
        let previous = self.store.current(&key)?;
        self.store.clear(&key)?;
        log!("counter"; "reset {} (was {})", key, previous);
        Ok(())
    }
}
