//! Immutable taxonomy tree.
//!
//! ```text
//! TaxonomyTree
//! └── LayerEntry (S, 2, Stars)
//!     └── CategoryEntry (POP, 001, Pop)
//!         └── TaxonomyItem (DIV, 002, Pop Diva Female Stars)
//! ```
//!
//! Alphabetic codes are unique within each sibling set and construction
//! fails otherwise. Numeric codes may repeat inside a sibling set; the raw
//! catalog does not guarantee numeric uniqueness and the override table is
//! what restores it.

use rustc_hash::FxHashMap;
use serde::Serialize;

use super::catalog::{CatalogRecord, CatalogSource};
use super::code::{AlphaCode, NumericCode};
use super::layer::Layer;
use crate::error::{RegistryError, Result};

/// A category or subcategory leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyItem {
    pub code: AlphaCode,
    pub numeric_code: NumericCode,
    pub name: String,
}

impl TaxonomyItem {
    fn from_record(code: &str, record: &CatalogRecord, scope: &str) -> Result<Self> {
        let code = AlphaCode::parse(code)
            .map_err(|e| RegistryError::InvalidCatalog(format!("{scope}: {e}")))?;
        let numeric_code = NumericCode::parse(&record.numeric_code)
            .map_err(|e| RegistryError::InvalidCatalog(format!("{scope}.{code}: {e}")))?;
        Ok(Self {
            code,
            numeric_code,
            name: record.name.clone(),
        })
    }
}

/// Ordered sibling set with alpha and numeric indexes.
///
/// The numeric index keeps the first item declared for each code.
#[derive(Debug, Clone, Default)]
struct Siblings {
    by_alpha: FxHashMap<AlphaCode, usize>,
    by_numeric: FxHashMap<NumericCode, usize>,
}

impl Siblings {
    fn insert(&mut self, code: &AlphaCode, numeric: NumericCode, index: usize, scope: &str) -> Result<()> {
        if self.by_alpha.insert(code.clone(), index).is_some() {
            return Err(RegistryError::InvalidCatalog(format!(
                "duplicate code `{code}` in `{scope}`"
            )));
        }
        self.by_numeric.entry(numeric).or_insert(index);
        Ok(())
    }
}

// ============================================================================
// CategoryEntry
// ============================================================================

/// A category and its subcategories.
#[derive(Debug, Clone)]
pub struct CategoryEntry {
    pub item: TaxonomyItem,
    subcategories: Vec<TaxonomyItem>,
    index: Siblings,
}

impl CategoryEntry {
    fn new(item: TaxonomyItem) -> Self {
        Self {
            item,
            subcategories: Vec::new(),
            index: Siblings::default(),
        }
    }

    #[inline]
    pub fn code(&self) -> &AlphaCode {
        &self.item.code
    }

    #[inline]
    pub fn numeric_code(&self) -> NumericCode {
        self.item.numeric_code
    }

    /// Subcategories in declared order.
    #[inline]
    pub fn subcategories(&self) -> &[TaxonomyItem] {
        &self.subcategories
    }

    pub fn subcategory(&self, code: &str) -> Option<&TaxonomyItem> {
        let code = AlphaCode::parse(code).ok()?;
        self.index.by_alpha.get(&code).map(|&i| &self.subcategories[i])
    }

    /// First subcategory declared with this numeric code.
    pub fn subcategory_by_numeric(&self, numeric: NumericCode) -> Option<&TaxonomyItem> {
        self.index.by_numeric.get(&numeric).map(|&i| &self.subcategories[i])
    }

    fn push(&mut self, item: TaxonomyItem, scope: &str) -> Result<()> {
        let index = self.subcategories.len();
        self.index.insert(&item.code, item.numeric_code, index, scope)?;
        self.subcategories.push(item);
        Ok(())
    }
}

// ============================================================================
// LayerEntry
// ============================================================================

/// A layer and its categories.
#[derive(Debug, Clone)]
pub struct LayerEntry {
    pub layer: Layer,
    pub name: String,
    categories: Vec<CategoryEntry>,
    index: Siblings,
}

impl LayerEntry {
    /// Categories in declared order.
    #[inline]
    pub fn categories(&self) -> &[CategoryEntry] {
        &self.categories
    }

    pub fn category(&self, code: &str) -> Option<&CategoryEntry> {
        let code = AlphaCode::parse(code).ok()?;
        self.index.by_alpha.get(&code).map(|&i| &self.categories[i])
    }

    pub fn category_by_numeric(&self, numeric: NumericCode) -> Option<&CategoryEntry> {
        self.index.by_numeric.get(&numeric).map(|&i| &self.categories[i])
    }

    fn category_mut(&mut self, code: &AlphaCode) -> Option<&mut CategoryEntry> {
        let i = *self.index.by_alpha.get(code)?;
        self.categories.get_mut(i)
    }
}

// ============================================================================
// TaxonomyTree
// ============================================================================

/// The canonical layer/category/subcategory catalog.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyTree {
    version: String,
    layers: Vec<LayerEntry>,
}

impl TaxonomyTree {
    /// Build a tree from a catalog document, failing fast on malformed data.
    pub fn from_source(source: &CatalogSource) -> Result<Self> {
        let mut layers: Vec<LayerEntry> = Vec::new();

        for (key, raw) in source.layer_records()? {
            let layer = Layer::parse(&key)
                .map_err(|_| RegistryError::InvalidCatalog(format!("unknown layer `{key}`")))?;

            if layers.iter().any(|l| l.layer == layer) {
                return Err(RegistryError::InvalidCatalog(format!(
                    "layer {layer} declared twice"
                )));
            }
            if let Some(numeric) = raw.numeric_code
                && numeric != layer.numeric()
            {
                return Err(RegistryError::InvalidCatalog(format!(
                    "layer {layer} declares numeric code {numeric}, expected {}",
                    layer.numeric()
                )));
            }

            let mut entry = LayerEntry {
                layer,
                name: raw.name.clone().unwrap_or_else(|| layer.name().to_string()),
                categories: Vec::new(),
                index: Siblings::default(),
            };

            for (code, record) in raw.category_records()? {
                let item = TaxonomyItem::from_record(&code, &record, layer.code())?;
                let index = entry.categories.len();
                entry.index.insert(&item.code, item.numeric_code, index, layer.code())?;
                entry.categories.push(CategoryEntry::new(item));
            }

            for (key, record) in raw.subcategory_records()? {
                let (category, sub) = key.split_once('.').ok_or_else(|| {
                    RegistryError::InvalidCatalog(format!(
                        "subcategory key `{layer}.{key}` must be CAT.SUB"
                    ))
                })?;
                let category = AlphaCode::parse(category)
                    .map_err(|e| RegistryError::InvalidCatalog(format!("{layer}.{key}: {e}")))?;
                let scope = format!("{layer}.{category}");
                let item = TaxonomyItem::from_record(sub, &record, &scope)?;
                entry
                    .category_mut(&category)
                    .ok_or_else(|| {
                        RegistryError::InvalidCatalog(format!(
                            "subcategory `{layer}.{key}` references undeclared category"
                        ))
                    })?
                    .push(item, &scope)?;
            }

            layers.push(entry);
        }

        Ok(Self {
            version: source.version.clone(),
            layers,
        })
    }

    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Layers in declared order.
    #[inline]
    pub fn layers(&self) -> &[LayerEntry] {
        &self.layers
    }

    pub fn get_layer(&self, layer: Layer) -> Option<&LayerEntry> {
        self.layers.iter().find(|l| l.layer == layer)
    }

    /// Categories of a layer in declared order.
    pub fn get_categories(&self, layer: Layer) -> Result<&[CategoryEntry]> {
        self.get_layer(layer)
            .map(LayerEntry::categories)
            .ok_or_else(|| RegistryError::InvalidLayer(layer.code().to_string()))
    }

    /// Subcategories of a category in declared order.
    pub fn get_subcategories(&self, layer: Layer, category: &str) -> Result<&[TaxonomyItem]> {
        let entry = self
            .get_layer(layer)
            .ok_or_else(|| RegistryError::InvalidLayer(layer.code().to_string()))?;
        entry
            .category(category)
            .map(CategoryEntry::subcategories)
            .ok_or_else(|| RegistryError::InvalidCategory {
                layer,
                category: category.to_string(),
            })
    }

    /// Every (layer, category, subcategory) triple in declared order.
    pub fn paths(&self) -> impl Iterator<Item = (Layer, &CategoryEntry, &TaxonomyItem)> {
        self.layers.iter().flat_map(|l| {
            l.categories
                .iter()
                .flat_map(move |c| c.subcategories.iter().map(move |s| (l.layer, c, s)))
        })
    }

    /// `(layers, categories, subcategories)` counts.
    pub fn counts(&self) -> (usize, usize, usize) {
        let categories = self.layers.iter().map(|l| l.categories.len()).sum();
        (self.layers.len(), categories, self.paths().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(json: &str) -> Result<TaxonomyTree> {
        TaxonomyTree::from_source(&CatalogSource::from_str(json).unwrap())
    }

    fn bundled() -> TaxonomyTree {
        TaxonomyTree::from_source(&CatalogSource::bundled().unwrap()).unwrap()
    }

    #[test]
    fn test_bundled_tree_lookup() {
        let tree = bundled();
        let stars = tree.get_layer(Layer::Stars).unwrap();
        assert_eq!(stars.name, "Stars");

        let pop = stars.category("pop").unwrap();
        assert_eq!(pop.numeric_code().to_string(), "001");
        assert_eq!(pop.subcategory("DIV").unwrap().name, "Pop Diva Female Stars");
        assert!(pop.subcategory("HPM").is_none());
    }

    #[test]
    fn test_listing_order_is_declared_order() {
        let tree = bundled();
        let cats: Vec<_> = tree
            .get_categories(Layer::Songs)
            .unwrap()
            .iter()
            .map(|c| c.code().as_str())
            .collect();
        assert_eq!(cats[..4], ["POP", "ROK", "HIP", "EDM"]);

        let subs = tree.get_subcategories(Layer::Songs, "POP").unwrap();
        assert_eq!(subs.first().unwrap().code, "BAS");
        assert_eq!(subs.last().unwrap().code, "TSW");
    }

    #[test]
    fn test_numeric_duplicates_are_tolerated() {
        let tree = bundled();
        let hip = tree.get_layer(Layer::Stars).unwrap().category("HIP").unwrap();
        let one = NumericCode::parse("001").unwrap();
        // BAS and CLS both carry 001; the first declared wins the raw index.
        assert_eq!(hip.subcategory_by_numeric(one).unwrap().code, "BAS");
        assert_eq!(hip.subcategory("CLS").unwrap().numeric_code, one);
    }

    #[test]
    fn test_duplicate_alpha_fails() {
        let err = tree(
            r#"{"layers": {"G": {
                "categories": {"POP": {"numericCode": "001", "name": "Pop"}},
                "subcategories": {
                    "POP.BAS": {"numericCode": "001", "name": "Base"},
                    "POP.bas": {"numericCode": "002", "name": "Base again"}
                }
            }}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidCatalog(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_undeclared_category_fails() {
        let err = tree(
            r#"{"layers": {"G": {
                "categories": {},
                "subcategories": {"POP.BAS": {"numericCode": "001", "name": "Base"}}
            }}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidCatalog(_)));
    }

    #[test]
    fn test_layer_numeric_mismatch_fails() {
        let err = tree(r#"{"layers": {"S": {"numericCode": 5}}}"#).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidCatalog(msg) if msg.contains("expected 2")));
        assert!(tree(r#"{"layers": {"Q": {}}}"#).is_err());
    }

    #[test]
    fn test_missing_layer_and_category() {
        let tree = tree(r#"{"layers": {"G": {}}}"#).unwrap();
        assert!(matches!(
            tree.get_categories(Layer::Stars),
            Err(RegistryError::InvalidLayer(_))
        ));
        assert!(matches!(
            tree.get_subcategories(Layer::Songs, "POP"),
            Err(RegistryError::InvalidCategory { .. })
        ));
    }

    #[test]
    fn test_counts() {
        let (layers, categories, subcategories) = bundled().counts();
        assert_eq!(layers, 10);
        assert!(categories >= 40);
        assert!(subcategories > categories);
    }
}
