//! Alphabetic and numeric taxonomy codes.
//!
//! Every category and subcategory carries two codes:
//!
//! ```text
//! AlphaCode    "POP"  ->  used in human-friendly names
//! NumericCode  "001"  ->  used in machine-friendly addresses
//! ```
//!
//! Callers may pass either form anywhere a code is expected, so
//! [`CodeForm::detect`] decides which one a raw segment is.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RegistryError, Result};

/// Syntactic form of a raw code segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeForm {
    /// Only ASCII digits.
    Numeric,
    /// ASCII alphanumeric with at least one letter.
    Alpha,
    /// Empty or containing other characters.
    Invalid,
}

impl CodeForm {
    /// Classify a raw segment without consulting any catalog.
    pub fn detect(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Self::Invalid
        } else if raw.bytes().all(|b| b.is_ascii_digit()) {
            Self::Numeric
        } else {
            Self::Alpha
        }
    }
}

// ============================================================================
// AlphaCode
// ============================================================================

/// Three-character uppercase code (e.g. `POP`, `HPM`, `K9X`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlphaCode(String);

impl AlphaCode {
    pub const LEN: usize = 3;

    /// Parse and normalize to uppercase.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.len() != Self::LEN || CodeForm::detect(raw) != CodeForm::Alpha {
            return Err(RegistryError::InvalidCatalog(format!(
                "`{raw}` is not a 3-character alphabetic code"
            )));
        }
        Ok(Self(raw.to_ascii_uppercase()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlphaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AlphaCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for AlphaCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for AlphaCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for AlphaCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AlphaCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// NumericCode
// ============================================================================

/// Numeric code rendered zero-padded to three digits (`7` -> `"007"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NumericCode(u16);

impl NumericCode {
    /// Placeholder returned for codes absent from the taxonomy.
    pub const UNKNOWN: Self = Self(0);
    pub const MAX: u16 = 999;

    pub const fn new(value: u16) -> Option<Self> {
        if value <= Self::MAX { Some(Self(value)) } else { None }
    }

    /// Parse a digit string of one to three characters.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.len() > 3 || CodeForm::detect(raw) != CodeForm::Numeric {
            return Err(RegistryError::InvalidCatalog(format!(
                "`{raw}` is not a numeric code of at most 3 digits"
            )));
        }
        raw.parse::<u16>()
            .map(Self)
            .map_err(|e| RegistryError::InvalidCatalog(format!("`{raw}`: {e}")))
    }

    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_unknown(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NumericCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl Serialize for NumericCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NumericCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_form_detect() {
        assert_eq!(CodeForm::detect("007"), CodeForm::Numeric);
        assert_eq!(CodeForm::detect("7"), CodeForm::Numeric);
        assert_eq!(CodeForm::detect("HPM"), CodeForm::Alpha);
        assert_eq!(CodeForm::detect("k9x"), CodeForm::Alpha);
        assert_eq!(CodeForm::detect(""), CodeForm::Invalid);
        assert_eq!(CodeForm::detect("P-P"), CodeForm::Invalid);
    }

    #[test]
    fn test_alpha_code_normalizes_case() {
        assert_eq!(AlphaCode::parse("hpm").unwrap(), "HPM");
        assert!(AlphaCode::parse("HP").is_err());
        assert!(AlphaCode::parse("007").is_err());
        assert!(AlphaCode::parse("HPMX").is_err());
    }

    #[test]
    fn test_numeric_code_padding() {
        assert_eq!(NumericCode::parse("7").unwrap().to_string(), "007");
        assert_eq!(NumericCode::parse("012").unwrap().to_string(), "012");
        assert_eq!(NumericCode::UNKNOWN.to_string(), "000");
        assert!(NumericCode::parse("1000").is_err());
        assert!(NumericCode::parse("0a1").is_err());
        assert!(NumericCode::new(1000).is_none());
    }

    #[test]
    fn test_codes_serde() {
        let code: NumericCode = serde_json::from_str("\"012\"").unwrap();
        assert_eq!(code.value(), 12);
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"012\"");

        let alpha: AlphaCode = serde_json::from_str("\"tsw\"").unwrap();
        assert_eq!(alpha, "TSW");
        assert!(serde_json::from_str::<AlphaCode>("\"T\"").is_err());
    }
}
