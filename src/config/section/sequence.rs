//! `[sequence]` section configuration.
//!
//! Controls where per-path counters live and how hard the allocator
//! retries when it loses a race.
//!
//! # Example
//!
//! ```toml
//! [sequence]
//! store = "file"              # file | memory
//! dir = ".nna/counters"       # Counter directory (file store only)
//! max_retries = 16            # Attempts before reporting a sequence conflict
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Counter store backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// One JSON file per taxonomy path.
    #[default]
    File,
    /// Process-local, lost on exit.
    Memory,
}

/// Sequence allocation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    pub store: StoreKind,

    /// Counter directory for the file store.
    pub dir: PathBuf,

    /// Compare-and-set attempts per allocation.
    pub max_retries: u32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::File,
            dir: PathBuf::from(".nna/counters"),
            max_retries: 16,
        }
    }
}

impl SequenceConfig {
    pub const DIR: FieldPath = FieldPath::new("sequence.dir");
    pub const MAX_RETRIES: FieldPath = FieldPath::new("sequence.max_retries");
    pub const STORE: FieldPath = FieldPath::new("sequence.store");

    /// Expand `~` and resolve against the project root.
    pub fn normalize(&mut self, root: &Path) {
        let raw = self.dir.to_string_lossy();
        let expanded = PathBuf::from(shellexpand::tilde(&raw).into_owned());
        let full = if expanded.is_relative() {
            root.join(expanded)
        } else {
            expanded
        };
        self.dir = crate::config::util::normalize_path(&full);
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.max_retries == 0 {
            diag.error_with_hint(
                Self::MAX_RETRIES,
                "must be at least 1",
                "a single attempt is `max_retries = 1`",
            );
        }
        if self.store == StoreKind::Memory {
            diag.warn(
                Self::STORE,
                "memory counters are lost on exit; every `nna` run restarts at 001",
            );
        }
        if self.store == StoreKind::File && self.dir.is_file() {
            diag.error(
                Self::DIR,
                format!("`{}` is a file, expected a directory", self.dir.display()),
            );
        }
    }
}
