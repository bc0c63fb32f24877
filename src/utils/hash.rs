//! Source fingerprints using FxHash.
//!
//! Used to tell whether catalog or override sources changed between two
//! loads, so an unchanged refresh can skip rebuilding the taxonomy.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Hash several sources in order, with length prefixes so that
/// `["ab", "c"]` and `["a", "bc"]` differ.
pub fn compute_all<'a>(parts: impl IntoIterator<Item = &'a str>) -> u64 {
    let mut hasher = FxHasher::default();
    for part in parts {
        hasher.write_usize(part.len());
        hasher.write(part.as_bytes());
    }
    hasher.finish()
}
