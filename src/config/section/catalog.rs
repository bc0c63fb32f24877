//! `[catalog]` section configuration.
//!
//! Points at the taxonomy sources. Both are optional; the catalog and
//! override table bundled with the binary are used when unset.
//!
//! # Example
//!
//! ```toml
//! [catalog]
//! path = "taxonomy/catalog.json"        # Layer/category/subcategory catalog
//! overrides = "taxonomy/overrides.toml" # Scoped subcategory overrides
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Taxonomy source settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog JSON file. `None` uses the bundled catalog.
    pub path: Option<PathBuf>,

    /// Override table TOML file. `None` uses the bundled table.
    pub overrides: Option<PathBuf>,
}

impl CatalogConfig {
    pub const PATH: FieldPath = FieldPath::new("catalog.path");
    pub const OVERRIDES: FieldPath = FieldPath::new("catalog.overrides");

    /// Resolve relative paths against the project root.
    pub fn normalize(&mut self, root: &Path) {
        for path in [&mut self.path, &mut self.overrides].into_iter().flatten() {
            *path = crate::config::util::normalize_path(&root.join(&*path));
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(path) = &self.path
            && !path.is_file()
        {
            diag.error_with_hint(
                Self::PATH,
                format!("catalog file `{}` not found", path.display()),
                "remove the field to use the bundled catalog",
            );
        }
        if let Some(path) = &self.overrides
            && !path.is_file()
        {
            diag.error(
                Self::OVERRIDES,
                format!("override table `{}` not found", path.display()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_catalog_defaults_to_bundled() {
        let config = test_parse_config("");
        assert!(config.catalog.path.is_none());
        assert!(config.catalog.overrides.is_none());
    }

    #[test]
    fn test_catalog_paths() {
        let config = test_parse_config("[catalog]\npath = \"data/catalog.json\"");
        assert_eq!(
            config.catalog.path.as_deref(),
            Some(std::path::Path::new("data/catalog.json"))
        );
    }
}
