//! Versioned catalog source.
//!
//! The catalog is plain data handed to the engine by a collaborator. It is
//! keyed by layer, then by `CAT` for categories and `CAT.SUB` for
//! subcategories. Key order is preserved, so the declared order becomes
//! the listing order.
//!
//! ```json
//! {
//!   "version": "1.4.0",
//!   "layers": {
//!     "S": {
//!       "name": "Stars",
//!       "numericCode": 2,
//!       "categories":    { "POP": { "numericCode": "001", "name": "Pop" } },
//!       "subcategories": { "POP.BAS": { "numericCode": "001", "name": "Base" } }
//!     }
//!   },
//!   "aliases": { "S.POP.HIP": "S.POP.HPM" }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::error::{RegistryError, Result};

/// Catalog shipped with the binary.
pub const BUNDLED_CATALOG: &str = include_str!("../../data/catalog.json");

/// A single `{ numericCode, name }` record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    pub numeric_code: String,
    pub name: String,
}

/// Raw per-layer data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogLayer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub numeric_code: Option<u8>,
    #[serde(default)]
    pub categories: Map<String, serde_json::Value>,
    #[serde(default)]
    pub subcategories: Map<String, serde_json::Value>,
}

impl CatalogLayer {
    /// Categories as typed records, in declared order.
    pub fn category_records(&self) -> Result<Vec<(String, CatalogRecord)>> {
        Self::typed(&self.categories)
    }

    /// Subcategories as typed records keyed by `CAT.SUB`, in declared order.
    pub fn subcategory_records(&self) -> Result<Vec<(String, CatalogRecord)>> {
        Self::typed(&self.subcategories)
    }

    fn typed(map: &Map<String, serde_json::Value>) -> Result<Vec<(String, CatalogRecord)>> {
        map.iter()
            .map(|(key, value)| {
                let record = CatalogRecord::deserialize(value).map_err(|e| {
                    RegistryError::InvalidCatalog(format!("entry `{key}`: {e}"))
                })?;
                Ok((key.clone(), record))
            })
            .collect()
    }
}

/// The whole catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSource {
    #[serde(default)]
    pub version: String,
    pub layers: Map<String, serde_json::Value>,
    #[serde(default)]
    pub aliases: Map<String, serde_json::Value>,
}

impl CatalogSource {
    pub fn from_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))?;
        Self::from_str(&content)
    }

    pub fn bundled() -> Result<Self> {
        Self::from_str(BUNDLED_CATALOG)
    }

    /// Layers in declared order.
    pub fn layer_records(&self) -> Result<Vec<(String, CatalogLayer)>> {
        self.layers
            .iter()
            .map(|(key, value)| {
                let layer = CatalogLayer::deserialize(value).map_err(|e| {
                    RegistryError::InvalidCatalog(format!("layer `{key}`: {e}"))
                })?;
                Ok((key.clone(), layer))
            })
            .collect()
    }

    /// Legacy `L.CAT.SUB` strings mapped to canonical ones.
    pub fn alias_pairs(&self) -> Result<Vec<(String, String)>> {
        self.aliases
            .iter()
            .map(|(from, to)| {
                to.as_str()
                    .map(|to| (from.clone(), to.to_string()))
                    .ok_or_else(|| {
                        RegistryError::InvalidCatalog(format!("alias `{from}` must map to a string"))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_parses() {
        let source = CatalogSource::bundled().unwrap();
        assert!(!source.version.is_empty());

        let layers = source.layer_records().unwrap();
        let keys: Vec<_> = layers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["G", "S", "L", "M", "W", "B", "P", "T", "C", "R"]);
    }

    #[test]
    fn test_declared_order_preserved() {
        let source = CatalogSource::bundled().unwrap();
        let (_, songs) = &source.layer_records().unwrap()[0];
        let subs = songs.subcategory_records().unwrap();
        assert_eq!(subs[0].0, "POP.BAS");
        assert_eq!(subs[11].0, "POP.TSW");
        assert_eq!(subs[11].1.numeric_code, "012");
    }

    #[test]
    fn test_bad_record_is_invalid_catalog() {
        let source = CatalogSource::from_str(
            r#"{"layers": {"G": {"categories": {"POP": {"name": "Pop"}}}}}"#,
        )
        .unwrap();
        let (_, layer) = &source.layer_records().unwrap()[0];
        let err = layer.category_records().unwrap_err();
        assert!(matches!(err, RegistryError::InvalidCatalog(_)));
    }

    #[test]
    fn test_alias_must_be_string() {
        let source =
            CatalogSource::from_str(r#"{"layers": {}, "aliases": {"S.POP.HIP": 7}}"#).unwrap();
        assert!(source.alias_pairs().is_err());
    }
}
