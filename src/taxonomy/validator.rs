//! Taxonomy path validation.
//!
//! A path is valid when each level resolves, directly or through the
//! catalog's alias table. Validation normalizes case and accepts either
//! code form at every level.

use serde::Serialize;

use super::code::NumericCode;
use super::engine::{EffectiveSubcategory, Taxonomy};
use super::layer::Layer;
use super::tree::TaxonomyItem;
use crate::debug;
use crate::error::{RegistryError, Result};

/// A fully resolved `(layer, category, subcategory)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPath {
    pub layer: Layer,
    pub category: TaxonomyItem,
    pub subcategory: EffectiveSubcategory,
    /// Legacy path this was reached through, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<String>,
}

impl ResolvedPath {
    /// `S.POP.HPM`
    pub fn hfn_prefix(&self) -> String {
        format!(
            "{}.{}.{}",
            self.layer.code(),
            self.category.code,
            self.subcategory.code
        )
    }

    /// `2.001.007`
    pub fn mfa_prefix(&self) -> String {
        format!(
            "{}.{}.{}",
            self.layer.numeric(),
            self.category.numeric_code,
            self.subcategory.numeric_code
        )
    }

    /// `(layer, category, subcategory)` numeric tuple.
    pub fn numeric_tuple(&self) -> (u8, NumericCode, NumericCode) {
        (
            self.layer.numeric(),
            self.category.numeric_code,
            self.subcategory.numeric_code,
        )
    }
}

/// Path validator over a borrowed taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> Validator<'a> {
    pub const fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// Resolve a triple, falling back to aliases when the direct lookup fails.
    pub fn validate(&self, layer: &str, category: &str, subcategory: &str) -> Result<ResolvedPath> {
        let layer = self.taxonomy.layer(layer)?.layer;

        let direct = self.resolve_direct(layer, category, subcategory);
        if direct.is_ok() {
            return direct;
        }

        for key in self.alias_keys(layer, category, subcategory) {
            let Some(target) = self.taxonomy.alias(&key) else {
                continue;
            };
            let (l, c, s) = split_path(target)?;
            let mut path = self.resolve_direct(Layer::parse(l)?, c, s)?;
            debug!("validate"; "{} resolved through alias {}", key, target);
            path.alias_of = Some(key);
            return Ok(path);
        }

        direct
    }

    /// Validate a dotted `L.CAT.SUB` string.
    pub fn validate_path(&self, path: &str) -> Result<ResolvedPath> {
        let (layer, category, subcategory) = split_path(path)?;
        self.validate(layer, category, subcategory)
    }

    #[inline]
    pub fn is_valid(&self, layer: &str, category: &str, subcategory: &str) -> bool {
        self.validate(layer, category, subcategory).is_ok()
    }

    fn resolve_direct(&self, layer: Layer, category: &str, subcategory: &str) -> Result<ResolvedPath> {
        let cat = self
            .taxonomy
            .category(layer, category)
            .ok_or_else(|| RegistryError::InvalidCategory {
                layer,
                category: category.trim().to_ascii_uppercase(),
            })?;
        let sub = self
            .taxonomy
            .subcategory(layer, category, subcategory)
            .ok_or_else(|| RegistryError::InvalidSubcategory {
                layer,
                category: cat.code().to_string(),
                subcategory: subcategory.trim().to_ascii_uppercase(),
            })?;

        Ok(ResolvedPath {
            layer,
            category: cat.item.clone(),
            subcategory: sub,
            alias_of: None,
        })
    }

    /// Alias keys to try: the input as given, then with the category in alpha form.
    fn alias_keys(&self, layer: Layer, category: &str, subcategory: &str) -> Vec<String> {
        let subcategory = subcategory.trim().to_ascii_uppercase();
        let raw = format!(
            "{}.{}.{}",
            layer.code(),
            category.trim().to_ascii_uppercase(),
            subcategory
        );
        let alpha = format!(
            "{}.{}.{}",
            layer.code(),
            self.taxonomy.category_to_alpha(layer, category).display(),
            subcategory
        );

        if raw == alpha { vec![raw] } else { vec![raw, alpha] }
    }
}

fn split_path(path: &str) -> Result<(&str, &str, &str)> {
    let mut parts = path.trim().split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(l), Some(c), Some(s), None) => Ok((l, c, s)),
        _ => Err(RegistryError::MalformedAddress(path.to_string())),
    }
}
