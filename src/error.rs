//! Registry error types.
//!
//! Two groups share one enum:
//!
//! | Kind        | Variants                                            |
//! |-------------|-----------------------------------------------------|
//! | fatal       | `InvalidCatalog`, `AmbiguousOverride`               |
//! | recoverable | everything else                                     |
//!
//! Fatal errors only surface while loading the taxonomy; a request path
//! never produces them.

use std::path::PathBuf;

use thiserror::Error;

use crate::taxonomy::{Layer, TaxonomyLevel};

/// Result alias for registry operations.
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;

/// Errors produced by the taxonomy, codec and sequence layers.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("unknown {level} code `{code}` in `{scope}`")]
    UnknownCode {
        level: TaxonomyLevel,
        scope: String,
        code: String,
    },

    #[error("ambiguous override for {layer}.{category}: `{key}` maps to both `{first}` and `{second}`")]
    AmbiguousOverride {
        layer: Layer,
        category: String,
        key: String,
        first: String,
        second: String,
    },

    #[error("malformed address `{0}`")]
    MalformedAddress(String),

    #[error("sequence conflict on `{path}`: lost {attempts} consecutive races")]
    SequenceConflict { path: String, attempts: u32 },

    #[error("invalid layer `{0}`")]
    InvalidLayer(String),

    #[error("invalid category `{category}` in layer {layer}")]
    InvalidCategory { layer: Layer, category: String },

    #[error("invalid subcategory `{subcategory}` in {layer}.{category}")]
    InvalidSubcategory {
        layer: Layer,
        category: String,
        subcategory: String,
    },

    #[error("invalid sequential `{0}` (expected digits)")]
    InvalidSequential(String),

    #[error("invalid suffix: {0}")]
    InvalidSuffix(String),

    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    #[error("override table parsing error")]
    Toml(#[from] toml::de::Error),
}

impl RegistryError {
    /// Errors that must abort startup rather than fail a single request.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidCatalog(_) | Self::AmbiguousOverride { .. }
        )
    }

    /// Errors a caller may retry.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::SequenceConflict { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io(path.into(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::InvalidSubcategory {
            layer: Layer::Stars,
            category: "POP".into(),
            subcategory: "ZZZ".into(),
        };
        assert_eq!(err.to_string(), "invalid subcategory `ZZZ` in S.POP");

        let err = RegistryError::UnknownCode {
            level: TaxonomyLevel::Category,
            scope: "G".into(),
            code: "XYZ".into(),
        };
        assert_eq!(err.to_string(), "unknown category code `XYZ` in `G`");
    }

    #[test]
    fn test_fatal_classification() {
        assert!(RegistryError::InvalidCatalog("dup".into()).is_fatal());
        assert!(!RegistryError::MalformedAddress("G.POP".into()).is_fatal());

        let conflict = RegistryError::SequenceConflict {
            path: "S.POP.HPM".into(),
            attempts: 3,
        };
        assert!(conflict.is_transient());
        assert!(!conflict.is_fatal());
    }
}
