//! Exhaustive catalog audit.
//!
//! Construction already rejects catalogs that break scoped uniqueness.
//! The audit goes further and exercises the public conversions on every
//! path, so a catalog that loads but does not round-trip is caught
//! before it reaches production.

use std::fmt;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::code::NumericCode;
use super::engine::Taxonomy;
use super::layer::Layer;
use super::tree::CategoryEntry;

/// One inconsistency, attributed to a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogProblem {
    pub path: String,
    pub message: String,
}

impl fmt::Display for CatalogProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Summary of [`Taxonomy::check`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogReport {
    pub version: String,
    pub layers: usize,
    pub categories: usize,
    pub paths: usize,
    pub overrides: usize,
    pub aliases: usize,
    pub problems: Vec<CatalogProblem>,
}

impl CatalogReport {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

impl Taxonomy {
    /// Round-trip every category and subcategory through both directions
    /// and confirm numeric uniqueness inside every `(layer, category)`.
    pub fn check(&self) -> CatalogReport {
        let scopes: Vec<(Layer, &CategoryEntry)> = self
            .tree()
            .layers()
            .iter()
            .flat_map(|l| l.categories().iter().map(move |c| (l.layer, c)))
            .collect();

        let (paths, mut problems) = scopes
            .par_iter()
            .map(|&(layer, cat)| self.check_scope(layer, cat))
            .reduce(
                || (0, Vec::new()),
                |(n1, mut p1), (n2, p2)| {
                    p1.extend(p2);
                    (n1 + n2, p1)
                },
            );

        for (from, to) in self.alias_entries() {
            if let Err(e) = self.validator().validate_path(to) {
                problems.push(CatalogProblem {
                    path: from.to_string(),
                    message: format!("alias target `{to}` does not resolve: {e}"),
                });
            }
        }

        problems.sort_by(|a, b| a.path.cmp(&b.path));

        CatalogReport {
            version: self.tree().version().to_string(),
            layers: self.tree().layers().len(),
            categories: scopes.len(),
            paths,
            overrides: self.overrides().len(),
            aliases: self.alias_count(),
            problems,
        }
    }

    fn check_scope(&self, layer: Layer, cat: &CategoryEntry) -> (usize, Vec<CatalogProblem>) {
        let mut problems = Vec::new();
        let cat_code = cat.code().as_str();
        let scope = format!("{}.{}", layer.code(), cat_code);

        let cat_numeric = self.category_to_numeric(layer, cat_code).display();
        if cat_numeric != cat.numeric_code().to_string() {
            problems.push(CatalogProblem {
                path: scope.clone(),
                message: format!("category resolves to {cat_numeric}, declared {}", cat.numeric_code()),
            });
        }
        let cat_alpha = self.category_to_alpha(layer, &cat_numeric).display();
        if cat_alpha != cat_code {
            problems.push(CatalogProblem {
                path: scope.clone(),
                message: format!("category numeric {cat_numeric} resolves back to {cat_alpha}"),
            });
        }

        let subs = self.effective_subcategories(layer, cat);
        let mut owners: FxHashMap<NumericCode, &str> = FxHashMap::default();
        for sub in &subs {
            let path = format!("{scope}.{}", sub.code);

            if let Some(previous) = owners.insert(sub.numeric_code, sub.code.as_str()) {
                problems.push(CatalogProblem {
                    path: path.clone(),
                    message: format!("numeric {} also used by {previous}", sub.numeric_code),
                });
            }

            let numeric = self.subcategory_to_numeric(layer, cat_code, sub.code.as_str());
            let expected = sub.numeric_code.to_string();
            if numeric.display() != expected {
                problems.push(CatalogProblem {
                    path: path.clone(),
                    message: format!("resolves to {}, expected {expected}", numeric.display()),
                });
            }

            let alpha = self.subcategory_to_alpha(layer, cat_code, &expected).display();
            if alpha != sub.code.as_str() {
                problems.push(CatalogProblem {
                    path: path.clone(),
                    message: format!("numeric {expected} resolves back to {alpha}"),
                });
            }

            let hfn = format!("{path}.001");
            let codec = self.codec();
            let round_trip = codec.mfa_to_hfn(&codec.hfn_to_mfa(&hfn));
            if round_trip != hfn {
                problems.push(CatalogProblem {
                    path,
                    message: format!("address round trip produced {round_trip}"),
                });
            }
        }

        (subs.len(), problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_is_clean() {
        let report = Taxonomy::bundled().unwrap().check();
        assert!(report.is_clean(), "{:#?}", report.problems);
        assert_eq!(report.layers, 10);
        assert!(report.paths > report.categories);
        assert_eq!(report.aliases, 4);
    }

    #[test]
    fn test_report_serializes() {
        let report = Taxonomy::bundled().unwrap().check();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["layers"], 10);
        assert!(json["problems"].as_array().unwrap().is_empty());
    }
}
