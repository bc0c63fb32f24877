//! The NNA taxonomy: layers, categories, subcategories and their codes.
//!
//! | Module      | Purpose                                            |
//! |-------------|----------------------------------------------------|
//! | `code`      | `AlphaCode`, `NumericCode`, form detection         |
//! | `layer`     | Closed set of the ten layers                       |
//! | `catalog`   | Versioned JSON catalog source                      |
//! | `tree`      | Immutable layer/category/subcategory tree          |
//! | `resolver`  | Tree-only alpha <-> numeric resolution             |
//! | `overrides` | Scoped forced mappings, consulted first            |
//! | `engine`    | `Taxonomy`: tree + overrides + aliases             |
//! | `validator` | Path validation with alias fallback                |
//! | `audit`     | Exhaustive consistency report                      |
//! | `handle`    | Atomically refreshable shared taxonomy             |

mod audit;
mod catalog;
mod code;
mod engine;
mod handle;
mod layer;
mod overrides;
mod resolver;
mod tree;
mod validator;

pub use audit::{CatalogProblem, CatalogReport};
pub use catalog::{BUNDLED_CATALOG, CatalogLayer, CatalogRecord, CatalogSource};
pub use code::{AlphaCode, CodeForm, NumericCode};
pub use engine::{EffectiveSubcategory, EntrySource, Taxonomy};
pub use handle::{TaxonomyHandle, load_taxonomy, read_sources};
pub use layer::Layer;
pub use overrides::{BUNDLED_OVERRIDES, OverrideEntry, OverrideTable, OverrideTarget};
pub use resolver::{CodeResolver, Resolved, TaxonomyLevel};
pub use tree::{CategoryEntry, LayerEntry, TaxonomyItem, TaxonomyTree};
pub use validator::{ResolvedPath, Validator};
