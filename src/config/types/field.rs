//! Config field path.

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a field in `registry.toml`, used to point diagnostics
/// at the offending key.
///
/// ```ignore
/// diag.error(SequenceConfig::MAX_RETRIES, "must be at least 1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}
