//! Address value types.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{RegistryError, Result};
use crate::taxonomy::ResolvedPath;

// ============================================================================
// Sequential
// ============================================================================

/// Per-path instance number. Rendered with at least three digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sequential(u32);

impl Sequential {
    pub const FIRST: Self = Self(1);

    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Parse a run of ASCII digits; `7`, `07` and `007` are the same number.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RegistryError::InvalidSequential(raw.to_string()));
        }
        raw.parse()
            .map(Self)
            .map_err(|_| RegistryError::InvalidSequential(raw.to_string()))
    }

    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Sequential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl Serialize for Sequential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// Suffix
// ============================================================================

/// Trailing part of an address after the sequential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Suffix {
    /// `.mp4`, stored without the dot.
    Extension(String),
    /// Composite assembly `:<addr>+<addr>+...`, order preserved.
    Components(Vec<String>),
}

impl Suffix {
    /// Extension suffix; alphanumeric only, a leading dot is dropped.
    pub fn extension(raw: &str) -> Result<Self> {
        let ext = raw.trim().trim_start_matches('.');
        if ext.is_empty() || !ext.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(RegistryError::InvalidSuffix(format!(
                "extension `{raw}` must be alphanumeric"
            )));
        }
        Ok(Self::Extension(ext.to_string()))
    }

    /// Component list; each entry must itself look like an address.
    pub fn components<I, S>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Vec::new();
        for item in items {
            let item = item.as_ref().trim();
            if item.split('.').count() < 4 || item.contains([':', '+']) {
                return Err(RegistryError::InvalidSuffix(format!(
                    "component `{item}` is not an address"
                )));
            }
            list.push(item.to_string());
        }
        if list.is_empty() {
            return Err(RegistryError::InvalidSuffix("empty component list".into()));
        }
        Ok(Self::Components(list))
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extension(ext) => write!(f, ".{ext}"),
            Self::Components(list) => write!(f, ":{}", list.join("+")),
        }
    }
}

// ============================================================================
// Address
// ============================================================================

/// Which serialization an address string uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressForm {
    Hfn,
    Mfa,
}

impl AddressForm {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Hfn => Self::Mfa,
            Self::Mfa => Self::Hfn,
        }
    }
}

impl fmt::Display for AddressForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hfn => "hfn",
            Self::Mfa => "mfa",
        })
    }
}

/// One logical address. HFN and MFA are two renderings of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub path: ResolvedPath,
    pub sequential: Sequential,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<Suffix>,
}

impl Address {
    pub fn hfn(&self) -> String {
        self.render(self.path.hfn_prefix())
    }

    pub fn mfa(&self) -> String {
        self.render(self.path.mfa_prefix())
    }

    pub fn pair(&self) -> AddressPair {
        AddressPair {
            hfn: self.hfn(),
            mfa: self.mfa(),
        }
    }

    /// Same path numerics and sequential; the suffix is not compared.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.path.numeric_tuple() == other.path.numeric_tuple()
            && self.sequential == other.sequential
    }

    fn render(&self, prefix: String) -> String {
        let mut out = format!("{prefix}.{}", self.sequential);
        if let Some(suffix) = &self.suffix {
            out.push_str(&suffix.to_string());
        }
        out
    }
}

/// Both renderings of one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressPair {
    pub hfn: String,
    pub mfa: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_parse_and_format() {
        assert_eq!(Sequential::parse("3").unwrap().to_string(), "003");
        assert_eq!(Sequential::parse("003").unwrap(), Sequential::new(3));
        assert_eq!(Sequential::new(1000).to_string(), "1000");
        assert!(matches!(Sequential::parse("0a1"), Err(RegistryError::InvalidSequential(_))));
        assert!(Sequential::parse("").is_err());
        assert!(Sequential::parse("99999999999").is_err());
    }

    #[test]
    fn test_extension_suffix() {
        assert_eq!(Suffix::extension(".mp4").unwrap().to_string(), ".mp4");
        assert_eq!(Suffix::extension("png").unwrap(), Suffix::Extension("png".into()));
        assert!(Suffix::extension("tar.gz").is_err());
        assert!(Suffix::extension("").is_err());
    }

    #[test]
    fn test_component_suffix_keeps_order() {
        let suffix = Suffix::components(["2.001.007.003", "1.001.012.001", "2.001.007.003"]).unwrap();
        assert_eq!(suffix.to_string(), ":2.001.007.003+1.001.012.001+2.001.007.003");
        assert!(Suffix::components(["G.POP"]).is_err());
        assert!(Suffix::components(Vec::<String>::new()).is_err());
    }
}
