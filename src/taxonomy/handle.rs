//! Shared, atomically replaceable taxonomy.
//!
//! Readers take an `Arc<Taxonomy>` snapshot and keep using it for the
//! whole operation; a refresh never mutates a snapshot in place.

use std::fs;
use std::sync::Arc;

use arc_swap::ArcSwap;

use super::catalog::BUNDLED_CATALOG;
use super::engine::Taxonomy;
use super::overrides::BUNDLED_OVERRIDES;
use crate::config::CatalogConfig;
use crate::error::{RegistryError, Result};
use crate::utils::plural_count;
use crate::{debug, log};

#[derive(Debug)]
pub struct TaxonomyHandle {
    current: ArcSwap<Taxonomy>,
}

impl TaxonomyHandle {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self {
            current: ArcSwap::from_pointee(taxonomy),
        }
    }

    /// Current snapshot.
    #[inline]
    pub fn load(&self) -> Arc<Taxonomy> {
        self.current.load_full()
    }

    /// Swap in a new taxonomy. In-flight readers keep their old snapshot.
    pub fn refresh(&self, taxonomy: Taxonomy) {
        self.current.store(Arc::new(taxonomy));
    }

    /// Rebuild from the configured sources.
    ///
    /// Returns `Ok(true)` if the taxonomy was replaced, `Ok(false)` if the
    /// sources are unchanged. A broken source leaves the current snapshot
    /// in place.
    pub fn reload(&self, config: &CatalogConfig) -> Result<bool> {
        let (catalog, overrides) = read_sources(config)?;
        let fingerprint = crate::utils::hash::compute_all([catalog.as_str(), overrides.as_str()]);

        if fingerprint == self.current.load().fingerprint() {
            debug!("refresh"; "catalog unchanged");
            return Ok(false);
        }

        let taxonomy = Taxonomy::from_sources(&catalog, &overrides)?;
        log!("refresh"; "catalog {} applied", taxonomy.tree().version());
        self.refresh(taxonomy);
        Ok(true)
    }
}

impl Default for TaxonomyHandle {
    fn default() -> Self {
        Self::new(Taxonomy::default())
    }
}

/// Catalog and override text, from the configured files or the bundled copies.
pub fn read_sources(config: &CatalogConfig) -> Result<(String, String)> {
    let read = |path: &std::path::Path| {
        fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))
    };
    let catalog = match &config.path {
        Some(path) => read(path)?,
        None => BUNDLED_CATALOG.to_string(),
    };
    let overrides = match &config.overrides {
        Some(path) => read(path)?,
        None => BUNDLED_OVERRIDES.to_string(),
    };
    Ok((catalog, overrides))
}

/// Build a taxonomy from configuration and log what was loaded.
pub fn load_taxonomy(config: &CatalogConfig) -> Result<Taxonomy> {
    let (catalog, overrides) = read_sources(config)?;
    let taxonomy = Taxonomy::from_sources(&catalog, &overrides)?;

    let (layers, categories, subcategories) = taxonomy.tree().counts();
    debug!(
        "catalog";
        "v{}: {}, {}, {}, {}, {}",
        taxonomy.tree().version(),
        plural_count(layers, "layer"),
        plural_count(categories, "category"),
        plural_count(subcategories, "subcategory"),
        plural_count(taxonomy.overrides().len(), "override"),
        plural_count(taxonomy.alias_count(), "alias")
    );
    Ok(taxonomy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Layer;
    use std::path::PathBuf;

    fn write_sources(dir: &std::path::Path, overrides: &str) -> CatalogConfig {
        let catalog = dir.join("catalog.json");
        let table = dir.join("overrides.toml");
        fs::write(&catalog, BUNDLED_CATALOG).unwrap();
        fs::write(&table, overrides).unwrap();
        CatalogConfig {
            path: Some(catalog),
            overrides: Some(table),
        }
    }

    #[test]
    fn test_load_bundled_by_default() {
        let taxonomy = load_taxonomy(&CatalogConfig::default()).unwrap();
        assert_eq!(taxonomy.tree().layers().len(), 10);
        assert_eq!(taxonomy.fingerprint(), Taxonomy::bundled().unwrap().fingerprint());
    }

    #[test]
    fn test_reload_skips_unchanged() {
        let handle = TaxonomyHandle::new(Taxonomy::bundled().unwrap());
        assert!(!handle.reload(&CatalogConfig::default()).unwrap());
    }

    #[test]
    fn test_reload_swaps_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let handle = TaxonomyHandle::new(Taxonomy::bundled().unwrap());
        let tik = |t: &Taxonomy| t.subcategory_to_numeric(Layer::Moves, "POP", "TIK").display();

        let before = handle.load();
        assert_eq!(tik(&before), "009");

        // An empty table leaves S.HIP.CLS colliding; the swap must not happen.
        let config = write_sources(dir.path(), "");
        assert!(handle.reload(&config).is_err());
        assert!(Arc::ptr_eq(&before, &handle.load()));

        // Dropping the TIK override exposes the catalog value.
        let config = write_sources(
            dir.path(),
            "[[override]]\nlayer = \"S\"\ncategory = \"POP\"\nalpha = \"HPM\"\nnumeric = \"007\"\n\
             [[override]]\nlayer = \"S\"\ncategory = \"HIP\"\nalpha = \"CLS\"\nnumeric = \"002\"\n",
        );
        assert!(handle.reload(&config).unwrap());
        assert_eq!(tik(&handle.load()), "004");
        assert_eq!(tik(&before), "009");
        assert!(!handle.reload(&config).unwrap());
    }

    #[test]
    fn test_missing_source_file() {
        let config = CatalogConfig {
            path: Some(PathBuf::from("/no/such/catalog.json")),
            overrides: None,
        };
        assert!(matches!(read_sources(&config), Err(RegistryError::Io(..))));
    }
}
