//! Tree, overrides and aliases bound into one consistent unit.
//!
//! Every subcategory lookup goes through the override table first and
//! falls back to the [`CodeResolver`] tree walk. Construction verifies
//! that the combination is a bijection inside every `(layer, category)`.

use rustc_hash::FxHashMap;
use serde::Serialize;

use super::catalog::{BUNDLED_CATALOG, CatalogSource};
use super::code::{AlphaCode, CodeForm, NumericCode};
use super::layer::Layer;
use super::overrides::{BUNDLED_OVERRIDES, OverrideTable, OverrideTarget};
use super::resolver::{CodeResolver, Resolved};
use super::tree::{CategoryEntry, LayerEntry, TaxonomyTree};
use super::validator::Validator;
use crate::address::AddressCodec;
use crate::error::{RegistryError, Result};
use crate::utils::hash;

/// Where a subcategory's effective numeric code comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    Catalog,
    Override,
}

/// A subcategory after override application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveSubcategory {
    pub code: AlphaCode,
    pub numeric_code: NumericCode,
    pub name: String,
    pub source: EntrySource,
}

/// Immutable taxonomy shared by every caller.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    tree: TaxonomyTree,
    overrides: OverrideTable,
    aliases: FxHashMap<String, String>,
    fingerprint: u64,
}

impl Taxonomy {
    /// Combine the parts, failing with `InvalidCatalog` if they disagree.
    pub fn new(
        tree: TaxonomyTree,
        overrides: OverrideTable,
        aliases: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self> {
        let mut taxonomy = Self {
            tree,
            overrides,
            aliases: FxHashMap::default(),
            fingerprint: 0,
        };
        taxonomy.check_override_scopes()?;
        taxonomy.check_category_uniqueness()?;
        taxonomy.check_scoped_uniqueness()?;
        for (from, to) in aliases {
            taxonomy.insert_alias(&from, &to)?;
        }
        Ok(taxonomy)
    }

    /// Parse both sources and combine them.
    pub fn from_sources(catalog: &str, overrides: &str) -> Result<Self> {
        let source = CatalogSource::from_str(catalog)?;
        let tree = TaxonomyTree::from_source(&source)?;
        let table = OverrideTable::from_toml(overrides)?;
        let mut taxonomy = Self::new(tree, table, source.alias_pairs()?)?;
        taxonomy.fingerprint = hash::compute_all([catalog, overrides]);
        Ok(taxonomy)
    }

    pub fn bundled() -> Result<Self> {
        Self::from_sources(BUNDLED_CATALOG, BUNDLED_OVERRIDES)
    }

    // ========================================================================
    // accessors
    // ========================================================================

    #[inline]
    pub fn tree(&self) -> &TaxonomyTree {
        &self.tree
    }

    #[inline]
    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    #[inline]
    pub fn resolver(&self) -> CodeResolver<'_> {
        CodeResolver::new(&self.tree)
    }

    #[inline]
    pub fn validator(&self) -> Validator<'_> {
        Validator::new(self)
    }

    #[inline]
    pub fn codec(&self) -> AddressCodec<'_> {
        AddressCodec::new(self)
    }

    /// Hash of the sources this taxonomy was built from (0 when built from parts).
    #[inline]
    pub const fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Canonical `L.CAT.SUB` for a legacy path string.
    pub fn alias(&self, path: &str) -> Option<&str> {
        self.aliases
            .get(&path.trim().to_ascii_uppercase())
            .map(String::as_str)
    }

    /// `(legacy, canonical)` alias pairs, unordered.
    pub fn alias_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    // ========================================================================
    // resolution
    // ========================================================================

    /// Layer present in this catalog, from any accepted form.
    pub fn layer(&self, raw: &str) -> Result<&LayerEntry> {
        let layer = Layer::parse(raw)?;
        self.tree
            .get_layer(layer)
            .ok_or_else(|| RegistryError::InvalidLayer(raw.to_string()))
    }

    /// Category entry from either code form.
    #[inline]
    pub fn category(&self, layer: Layer, raw: &str) -> Option<&CategoryEntry> {
        self.resolver().category_entry(layer, raw)
    }

    #[inline]
    pub fn category_to_numeric(&self, layer: Layer, raw: &str) -> Resolved<NumericCode> {
        self.resolver().alpha_to_numeric(layer, None, raw)
    }

    #[inline]
    pub fn category_to_alpha(&self, layer: Layer, raw: &str) -> Resolved<AlphaCode> {
        self.resolver().numeric_to_alpha(layer, None, raw)
    }

    /// Subcategory numeric code: override first, then the tree.
    pub fn subcategory_to_numeric(&self, layer: Layer, category: &str, raw: &str) -> Resolved<NumericCode> {
        if let Some(cat) = self.category(layer, category)
            && let Some(OverrideTarget::Numeric(numeric)) =
                self.overrides.resolve_subcategory(layer, cat.code(), raw.trim())
        {
            return Resolved::Found(numeric);
        }
        self.resolver().alpha_to_numeric(layer, Some(category), raw)
    }

    /// Subcategory alphabetic code: override first, then the tree.
    ///
    /// A catalog entry whose code is overridden is not reachable through
    /// its stale catalog number.
    pub fn subcategory_to_alpha(&self, layer: Layer, category: &str, raw: &str) -> Resolved<AlphaCode> {
        let raw = raw.trim();
        let Some(cat) = self.category(layer, category) else {
            return self.resolver().numeric_to_alpha(layer, Some(category), raw);
        };
        if let Some(OverrideTarget::Alpha(alpha)) =
            self.overrides.resolve_subcategory(layer, cat.code(), raw)
        {
            return Resolved::Found(alpha);
        }

        let resolved = self.resolver().numeric_to_alpha(layer, Some(category), raw);
        if CodeForm::detect(raw) != CodeForm::Numeric {
            return resolved;
        }
        match resolved {
            Resolved::Found(alpha) if self.is_overridden(layer, cat, &alpha) => {
                let Ok(numeric) = NumericCode::parse(raw) else {
                    return Resolved::Unknown(raw.to_string());
                };
                // The first raw match is shadowed; a later sibling may still own the number.
                cat.subcategories()
                    .iter()
                    .find(|s| s.numeric_code == numeric && !self.is_overridden(layer, cat, &s.code))
                    .map_or_else(|| Resolved::Unknown(raw.to_string()), |s| Resolved::Found(s.code.clone()))
            }
            other => other,
        }
    }

    /// Effective subcategory (after overrides) from either code form.
    pub fn subcategory(&self, layer: Layer, category: &str, raw: &str) -> Option<EffectiveSubcategory> {
        let cat = self.category(layer, category)?;
        let alpha = self.subcategory_to_alpha(layer, category, raw).found()?;
        self.effective_subcategories(layer, cat)
            .into_iter()
            .find(|s| s.code == alpha)
    }

    /// Subcategories of a category after override application.
    ///
    /// Catalog entries keep declared order; override-only entries follow,
    /// ordered by numeric code.
    pub fn subcategories(&self, layer: Layer, category: &str) -> Result<Vec<EffectiveSubcategory>> {
        self.tree.get_layer(layer).ok_or_else(|| RegistryError::InvalidLayer(layer.to_string()))?;
        let cat = self
            .category(layer, category)
            .ok_or_else(|| RegistryError::InvalidCategory {
                layer,
                category: category.to_string(),
            })?;
        Ok(self.effective_subcategories(layer, cat))
    }

    pub(crate) fn effective_subcategories(&self, layer: Layer, cat: &CategoryEntry) -> Vec<EffectiveSubcategory> {
        let mut entries: Vec<_> = cat
            .subcategories()
            .iter()
            .map(|item| {
                let forced = self.overrides.numeric_for(layer, cat.code(), item.code.as_str());
                EffectiveSubcategory {
                    code: item.code.clone(),
                    numeric_code: forced.unwrap_or(item.numeric_code),
                    name: item.name.clone(),
                    source: if forced.is_some() {
                        EntrySource::Override
                    } else {
                        EntrySource::Catalog
                    },
                }
            })
            .collect();

        let mut extra: Vec<_> = self
            .overrides
            .entries()
            .iter()
            .filter(|e| e.layer == layer && &e.category == cat.code())
            .filter(|e| cat.subcategory(e.alpha.as_str()).is_none())
            .map(|e| EffectiveSubcategory {
                code: e.alpha.clone(),
                numeric_code: e.numeric,
                name: e.name.clone().unwrap_or_else(|| e.alpha.to_string()),
                source: EntrySource::Override,
            })
            .collect();
        extra.sort_by_key(|e| e.numeric_code);
        entries.extend(extra);
        entries
    }

    fn is_overridden(&self, layer: Layer, cat: &CategoryEntry, alpha: &AlphaCode) -> bool {
        self.overrides
            .numeric_for(layer, cat.code(), alpha.as_str())
            .is_some()
    }

    // ========================================================================
    // construction checks
    // ========================================================================

    fn check_override_scopes(&self) -> Result<()> {
        for entry in self.overrides.entries() {
            let exists = self
                .tree
                .get_layer(entry.layer)
                .and_then(|l| l.category(entry.category.as_str()))
                .is_some();
            if !exists {
                return Err(RegistryError::InvalidCatalog(format!(
                    "override {}.{}.{} targets a category missing from the catalog",
                    entry.layer, entry.category, entry.alpha
                )));
            }
        }
        Ok(())
    }

    /// Category numbers have no override; they must be unique as declared.
    fn check_category_uniqueness(&self) -> Result<()> {
        for layer in self.tree.layers() {
            let mut owners: FxHashMap<NumericCode, &AlphaCode> = FxHashMap::default();
            for cat in layer.categories() {
                if let Some(previous) = owners.insert(cat.numeric_code(), cat.code()) {
                    return Err(RegistryError::InvalidCatalog(format!(
                        "{}: category numeric {} claimed by both {} and {}",
                        layer.layer,
                        cat.numeric_code(),
                        previous,
                        cat.code()
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_scoped_uniqueness(&self) -> Result<()> {
        for layer in self.tree.layers() {
            for cat in layer.categories() {
                let mut owners: FxHashMap<NumericCode, AlphaCode> = FxHashMap::default();
                for sub in self.effective_subcategories(layer.layer, cat) {
                    if let Some(previous) = owners.insert(sub.numeric_code, sub.code.clone()) {
                        return Err(RegistryError::InvalidCatalog(format!(
                            "{}.{}: numeric {} claimed by both {} and {}",
                            layer.layer,
                            cat.code(),
                            sub.numeric_code,
                            previous,
                            sub.code
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn insert_alias(&mut self, from: &str, to: &str) -> Result<()> {
        let canonical = self.validator().validate_path(to).map_err(|e| {
            RegistryError::InvalidCatalog(format!("alias `{from}` -> `{to}`: {e}"))
        })?;
        let key = from.trim().to_ascii_uppercase();
        if key.split('.').count() != 3 {
            return Err(RegistryError::InvalidCatalog(format!(
                "alias `{from}` must be L.CAT.SUB"
            )));
        }
        self.aliases.insert(key, canonical.hfn_prefix());
        Ok(())
    }
}
