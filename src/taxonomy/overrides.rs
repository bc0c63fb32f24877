//! Scoped subcategory overrides.
//!
//! Subcategory numeric codes are only unique inside their
//! `(layer, category)`, and a few of them cannot be derived from the
//! catalog at all. Those are listed here as declarative records:
//!
//! ```toml
//! [[override]]
//! layer = "S"
//! category = "POP"
//! alpha = "HPM"
//! numeric = "007"
//! name = "Pop Hipster Male Stars"   # display name when the catalog lacks it
//! note = "optional free text"
//! ```
//!
//! Each record works in both directions. Every lookup is scoped; there is
//! no global numeric -> alpha dictionary.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::code::{AlphaCode, CodeForm, NumericCode};
use super::layer::Layer;
use crate::error::{RegistryError, Result};

/// Override table shipped with the binary.
pub const BUNDLED_OVERRIDES: &str = include_str!("../../data/overrides.toml");

/// One forced mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub layer: Layer,
    pub category: AlphaCode,
    pub alpha: AlphaCode,
    pub numeric: NumericCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OverrideEntry {
    pub fn new(layer: Layer, category: &str, alpha: &str, numeric: &str) -> Result<Self> {
        Ok(Self {
            layer,
            category: AlphaCode::parse(category)?,
            alpha: AlphaCode::parse(alpha)?,
            numeric: NumericCode::parse(numeric)?,
            name: None,
            note: None,
        })
    }
}

/// The opposite form produced by an override hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideTarget {
    Alpha(AlphaCode),
    Numeric(NumericCode),
}

#[derive(Debug, Deserialize)]
struct OverrideFile {
    #[serde(rename = "override", default)]
    entries: Vec<OverrideEntry>,
}

/// Bidirectional maps for a single `(layer, category)`.
#[derive(Debug, Clone, Default)]
struct Scope {
    to_numeric: FxHashMap<AlphaCode, NumericCode>,
    to_alpha: FxHashMap<NumericCode, AlphaCode>,
}

/// Immutable set of overrides keyed by `(layer, category)`.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: Vec<OverrideEntry>,
    scopes: FxHashMap<(Layer, AlphaCode), Scope>,
}

impl OverrideTable {
    /// Build the table; contradicting entries fail with `AmbiguousOverride`.
    ///
    /// Repeated identical entries collapse into one.
    pub fn new(entries: impl IntoIterator<Item = OverrideEntry>) -> Result<Self> {
        let mut table = Self::default();

        for entry in entries {
            let scope = table
                .scopes
                .entry((entry.layer, entry.category.clone()))
                .or_default();

            let by_alpha = scope.to_numeric.get(&entry.alpha).copied();
            let by_numeric = scope.to_alpha.get(&entry.numeric).cloned();

            if let Some(existing) = by_alpha
                && existing != entry.numeric
            {
                return Err(RegistryError::AmbiguousOverride {
                    layer: entry.layer,
                    category: entry.category.to_string(),
                    key: entry.alpha.to_string(),
                    first: existing.to_string(),
                    second: entry.numeric.to_string(),
                });
            }
            if let Some(existing) = by_numeric
                && existing != entry.alpha
            {
                return Err(RegistryError::AmbiguousOverride {
                    layer: entry.layer,
                    category: entry.category.to_string(),
                    key: entry.numeric.to_string(),
                    first: existing.to_string(),
                    second: entry.alpha.to_string(),
                });
            }
            if by_alpha.is_some() {
                continue;
            }

            scope.to_numeric.insert(entry.alpha.clone(), entry.numeric);
            scope.to_alpha.insert(entry.numeric, entry.alpha.clone());
            table.entries.push(entry);
        }

        Ok(table)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: OverrideFile = toml::from_str(content)?;
        Self::new(file.entries)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))?;
        Self::from_toml(&content)
    }

    pub fn bundled() -> Result<Self> {
        Self::from_toml(BUNDLED_OVERRIDES)
    }

    /// Entries in declaration order.
    #[inline]
    pub fn entries(&self) -> &[OverrideEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn numeric_for(&self, layer: Layer, category: &AlphaCode, alpha: &str) -> Option<NumericCode> {
        let alpha = AlphaCode::parse(alpha).ok()?;
        self.scope(layer, category)?.to_numeric.get(&alpha).copied()
    }

    pub fn alpha_for(&self, layer: Layer, category: &AlphaCode, numeric: NumericCode) -> Option<&AlphaCode> {
        self.scope(layer, category)?.to_alpha.get(&numeric)
    }

    /// Resolve a subcategory value of either form to the opposite form.
    pub fn resolve_subcategory(
        &self,
        layer: Layer,
        category: &AlphaCode,
        value: &str,
    ) -> Option<OverrideTarget> {
        match CodeForm::detect(value) {
            CodeForm::Alpha => self
                .numeric_for(layer, category, value)
                .map(OverrideTarget::Numeric),
            CodeForm::Numeric => {
                let numeric = NumericCode::parse(value).ok()?;
                self.alpha_for(layer, category, numeric)
                    .cloned()
                    .map(OverrideTarget::Alpha)
            }
            CodeForm::Invalid => None,
        }
    }

    /// `(alpha, numeric)` pairs of one scope, unordered.
    pub fn scope_pairs(
        &self,
        layer: Layer,
        category: &AlphaCode,
    ) -> impl Iterator<Item = (&AlphaCode, NumericCode)> {
        self.scope(layer, category)
            .into_iter()
            .flat_map(|s| s.to_numeric.iter().map(|(a, &n)| (a, n)))
    }

    fn scope(&self, layer: Layer, category: &AlphaCode) -> Option<&Scope> {
        self.scopes.get(&(layer, category.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(layer: Layer, category: &str, alpha: &str, numeric: &str) -> OverrideEntry {
        OverrideEntry::new(layer, category, alpha, numeric).unwrap()
    }

    fn code(raw: &str) -> AlphaCode {
        AlphaCode::parse(raw).unwrap()
    }

    #[test]
    fn test_bundled_overrides() {
        let table = OverrideTable::bundled().unwrap();
        assert!(!table.is_empty());
        assert_eq!(
            table.numeric_for(Layer::Stars, &code("POP"), "HPM").unwrap().to_string(),
            "007"
        );
    }

    #[test]
    fn test_resolve_both_directions() {
        let table = OverrideTable::new([entry(Layer::Stars, "POP", "HPM", "007")]).unwrap();
        let pop = code("POP");

        assert_eq!(
            table.resolve_subcategory(Layer::Stars, &pop, "hpm"),
            Some(OverrideTarget::Numeric(NumericCode::parse("007").unwrap()))
        );
        assert_eq!(
            table.resolve_subcategory(Layer::Stars, &pop, "7"),
            Some(OverrideTarget::Alpha(code("HPM")))
        );
    }

    #[test]
    fn test_lookups_are_scoped() {
        let table = OverrideTable::new([
            entry(Layer::Stars, "POP", "HPM", "007"),
            entry(Layer::Stars, "HIP", "CLS", "007"),
        ])
        .unwrap();

        assert_eq!(
            table.resolve_subcategory(Layer::Stars, &code("HIP"), "007"),
            Some(OverrideTarget::Alpha(code("CLS")))
        );
        assert!(table.resolve_subcategory(Layer::Stars, &code("ROK"), "007").is_none());
        assert!(table.resolve_subcategory(Layer::Songs, &code("POP"), "HPM").is_none());
    }

    #[test]
    fn test_identical_duplicates_collapse() {
        let table = OverrideTable::new([
            entry(Layer::Songs, "POP", "TSW", "012"),
            entry(Layer::Songs, "POP", "TSW", "012"),
        ])
        .unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_ambiguous_alpha_fails() {
        let err = OverrideTable::new([
            entry(Layer::Stars, "POP", "HPM", "007"),
            entry(Layer::Stars, "POP", "HPM", "008"),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::AmbiguousOverride { ref key, .. } if key == "HPM"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_ambiguous_numeric_fails() {
        let err = OverrideTable::new([
            entry(Layer::Stars, "POP", "HPM", "007"),
            entry(Layer::Stars, "POP", "HPF", "007"),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::AmbiguousOverride { ref key, .. } if key == "007"));
    }

    #[test]
    fn test_toml_rejects_bad_codes() {
        let bad = "[[override]]\nlayer = \"S\"\ncategory = \"POP\"\nalpha = \"H\"\nnumeric = \"007\"";
        assert!(matches!(
            OverrideTable::from_toml(bad),
            Err(RegistryError::Toml(_))
        ));

        let bad_layer = "[[override]]\nlayer = \"Q\"\ncategory = \"POP\"\nalpha = \"HPM\"\nnumeric = \"007\"";
        assert!(OverrideTable::from_toml(bad_layer).is_err());
    }
}
