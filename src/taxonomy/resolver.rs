//! Generic alpha <-> numeric resolution against the tree.
//!
//! This is the fallback path. Scoped exceptions live in
//! [`OverrideTable`](super::OverrideTable) and are consulted first by the
//! [`Taxonomy`](super::Taxonomy) wrappers.

use std::fmt;

use serde::Serialize;

use super::code::{AlphaCode, CodeForm, NumericCode};
use super::layer::Layer;
use super::tree::{CategoryEntry, TaxonomyTree};
use crate::error::{RegistryError, Result};

/// Legacy display strings accepted as codes.
///
/// These normalize input only; they are not taxonomy entries.
const LEGACY_LITERALS: &[(&str, &str)] = &[("natural", "NAT"), ("base", "BAS")];

/// Level of the taxonomy a code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyLevel {
    Layer,
    Category,
    Subcategory,
}

impl fmt::Display for TaxonomyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Layer => "layer",
            Self::Category => "category",
            Self::Subcategory => "subcategory",
        })
    }
}

// ============================================================================
// Resolved
// ============================================================================

/// Outcome of a single-code lookup.
///
/// `Unknown` keeps the raw input so callers can display it unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<T> {
    Found(T),
    Unknown(String),
}

impl<T> Resolved<T> {
    #[inline]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    #[inline]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            Self::Unknown(_) => None,
        }
    }

    /// Turn `Unknown` into [`RegistryError::UnknownCode`].
    pub fn ok_or_unknown(self, level: TaxonomyLevel, scope: impl Into<String>) -> Result<T> {
        match self {
            Self::Found(v) => Ok(v),
            Self::Unknown(code) => Err(RegistryError::UnknownCode {
                level,
                scope: scope.into(),
                code,
            }),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        match self {
            Self::Found(v) => Resolved::Found(f(v)),
            Self::Unknown(raw) => Resolved::Unknown(raw),
        }
    }
}

impl<T: fmt::Display> Resolved<T> {
    /// Resolved value, or the raw input when unknown.
    pub fn display(&self) -> String {
        match self {
            Self::Found(v) => v.to_string(),
            Self::Unknown(raw) => raw.clone(),
        }
    }
}

impl Resolved<NumericCode> {
    /// Resolved code, or `000` when unknown.
    #[inline]
    pub fn or_placeholder(self) -> NumericCode {
        self.found().unwrap_or(NumericCode::UNKNOWN)
    }
}

// ============================================================================
// CodeResolver
// ============================================================================

/// Stateless resolver over a borrowed tree.
#[derive(Debug, Clone, Copy)]
pub struct CodeResolver<'a> {
    tree: &'a TaxonomyTree,
}

impl<'a> CodeResolver<'a> {
    pub const fn new(tree: &'a TaxonomyTree) -> Self {
        Self { tree }
    }

    /// Numeric code for a category (`category == None`) or a subcategory.
    ///
    /// Numeric input is returned padded without a lookup.
    pub fn alpha_to_numeric(
        &self,
        layer: Layer,
        category: Option<&str>,
        code: &str,
    ) -> Resolved<NumericCode> {
        let code = normalize_legacy(code);
        match CodeForm::detect(code) {
            CodeForm::Numeric => match NumericCode::parse(code) {
                Ok(numeric) => Resolved::Found(numeric),
                Err(_) => Resolved::Unknown(code.to_string()),
            },
            CodeForm::Alpha => {
                let found = match category {
                    None => self
                        .tree
                        .get_layer(layer)
                        .and_then(|l| l.category(code))
                        .map(|c| c.numeric_code()),
                    Some(category) => self
                        .category_entry(layer, category)
                        .and_then(|c| c.subcategory(code))
                        .map(|s| s.numeric_code),
                };
                found.map_or_else(|| Resolved::Unknown(code.to_string()), Resolved::Found)
            }
            CodeForm::Invalid => Resolved::Unknown(code.to_string()),
        }
    }

    /// Alphabetic code for a category (`category == None`) or a subcategory.
    ///
    /// Alphabetic input is returned uppercased without a lookup.
    pub fn numeric_to_alpha(
        &self,
        layer: Layer,
        category: Option<&str>,
        code: &str,
    ) -> Resolved<AlphaCode> {
        let code = normalize_legacy(code);
        match CodeForm::detect(code) {
            CodeForm::Alpha => AlphaCode::parse(code)
                .map_or_else(|_| Resolved::Unknown(code.to_string()), Resolved::Found),
            CodeForm::Numeric => {
                let Ok(numeric) = NumericCode::parse(code) else {
                    return Resolved::Unknown(code.to_string());
                };
                let found = match category {
                    None => self
                        .tree
                        .get_layer(layer)
                        .and_then(|l| l.category_by_numeric(numeric))
                        .map(|c| c.code().clone()),
                    Some(category) => self
                        .category_entry(layer, category)
                        .and_then(|c| c.subcategory_by_numeric(numeric))
                        .map(|s| s.code.clone()),
                };
                found.map_or_else(|| Resolved::Unknown(code.to_string()), Resolved::Found)
            }
            CodeForm::Invalid => Resolved::Unknown(code.to_string()),
        }
    }

    /// Category entry from either code form.
    pub fn category_entry(&self, layer: Layer, category: &str) -> Option<&'a CategoryEntry> {
        let layer = self.tree.get_layer(layer)?;
        let category = normalize_legacy(category);
        match CodeForm::detect(category) {
            CodeForm::Numeric => layer.category_by_numeric(NumericCode::parse(category).ok()?),
            CodeForm::Alpha => layer.category(category),
            CodeForm::Invalid => None,
        }
    }
}

/// Map legacy display literals to their code, otherwise trim.
fn normalize_legacy(raw: &str) -> &str {
    let trimmed = raw.trim();
    LEGACY_LITERALS
        .iter()
        .find(|(literal, _)| literal.eq_ignore_ascii_case(trimmed))
        .map_or(trimmed, |&(_, code)| code)
}
