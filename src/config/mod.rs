//! Registry configuration management for `registry.toml`.
//!
//! ```text
//! config/
//! ├── section/       # [catalog], [sequence]
//! ├── types/         # ConfigError, FieldPath, global handle
//! ├── util.rs        # config discovery, path normalization
//! └── mod.rs         # RegistryConfig (this file)
//! ```

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{CatalogConfig, SequenceConfig, StoreKind};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default file name searched for when `--config` is not given.
pub const CONFIG_FILE: &str = "registry.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `registry.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Absolute path to the config file, empty when running on defaults.
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub sequence: SequenceConfig,
}

impl RegistryConfig {
    /// Locate, parse, normalize and validate the configuration.
    ///
    /// A missing file is not an error: defaults rooted at the current
    /// directory are used instead.
    pub fn load(config_name: &Path) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current working directory")?;

        let mut config = match find_config_file(config_name) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = util::normalize_path(&path);
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", config_name.display());
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        config.normalize_paths();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {}, ignoring:", path.display());
        for field in fields {
            eprintln!("- {field}");
        }
    }

    // ========================================================================
    // paths
    // ========================================================================

    fn normalize_paths(&mut self) {
        self.root = util::normalize_path(&self.root);
        let root = self.root.clone();
        self.catalog.normalize(&root);
        self.sequence.normalize(&root);
    }

    /// Get path relative to the config root, for display.
    pub fn root_relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate every section, reporting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.catalog.validate(&mut diag);
        self.sequence.validate(&mut diag);

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config text, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> RegistryConfig {
    let (parsed, ignored) = RegistryConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_toml() {
        assert!(RegistryConfig::parse_with_ignored("[catalog\npath = 1").is_err());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[sequence]\nmax_retries = 4\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = RegistryConfig::parse_with_ignored(content).unwrap();
        assert_eq!(config.sequence.max_retries, 4);
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[sequence]\nstore = \"memory\"\ndir = \"counters\"\n").unwrap();

        let config = RegistryConfig::load(&path).unwrap();
        assert_eq!(config.sequence.store, StoreKind::Memory);
        assert!(config.sequence.dir.ends_with("counters"));
        assert!(config.sequence.dir.is_absolute());
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_load_rejects_missing_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[catalog]\npath = \"missing.json\"\n[sequence]\nmax_retries = 0\n").unwrap();

        let err = RegistryConfig::load(&path).unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err:?}");
        };
        assert_eq!(diag.errors().len(), 2);
    }

    #[test]
    fn test_root_relative() {
        let config = RegistryConfig {
            root: PathBuf::from("/srv/registry"),
            ..Default::default()
        };
        assert_eq!(
            config.root_relative(Path::new("/srv/registry/.nna/counters")),
            Path::new(".nna/counters")
        );
    }
}
