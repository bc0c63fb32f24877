//! Configuration section definitions.
//!
//! Each module corresponds to a section in `registry.toml`:
//!
//! | Module     | TOML Section   | Purpose                           |
//! |------------|----------------|-----------------------------------|
//! | `catalog`  | `[catalog]`    | Taxonomy catalog and overrides    |
//! | `sequence` | `[sequence]`   | Counter store and retry policy    |

mod catalog;
mod sequence;

pub use catalog::CatalogConfig;
pub use sequence::{SequenceConfig, StoreKind};
