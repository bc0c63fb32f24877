//! Top-level asset layers.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RegistryError, Result};

/// One of the ten fixed asset layers.
///
/// | Layer         | Short | Long | Numeric |
/// |---------------|-------|------|---------|
/// | Songs         | `G`   | `SNG`| 1       |
/// | Stars         | `S`   | `STR`| 2       |
/// | Looks         | `L`   | `LKS`| 3       |
/// | Moves         | `M`   | `MOV`| 4       |
/// | Worlds        | `W`   | `WLD`| 5       |
/// | Branded       | `B`   | `BRD`| 6       |
/// | Personalize   | `P`   | `PRS`| 7       |
/// | Training Data | `T`   | `TRN`| 8       |
/// | Composite     | `C`   | `CMP`| 9       |
/// | Rights        | `R`   | `RGT`| 10      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Songs,
    Stars,
    Looks,
    Moves,
    Worlds,
    Branded,
    Personalize,
    TrainingData,
    Composite,
    Rights,
}

impl Layer {
    /// All layers in numeric order.
    pub const ALL: [Self; 10] = [
        Self::Songs,
        Self::Stars,
        Self::Looks,
        Self::Moves,
        Self::Worlds,
        Self::Branded,
        Self::Personalize,
        Self::TrainingData,
        Self::Composite,
        Self::Rights,
    ];

    /// Single-letter code used in human-friendly names.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Songs => "G",
            Self::Stars => "S",
            Self::Looks => "L",
            Self::Moves => "M",
            Self::Worlds => "W",
            Self::Branded => "B",
            Self::Personalize => "P",
            Self::TrainingData => "T",
            Self::Composite => "C",
            Self::Rights => "R",
        }
    }

    /// Three-letter long form.
    pub const fn long_code(self) -> &'static str {
        match self {
            Self::Songs => "SNG",
            Self::Stars => "STR",
            Self::Looks => "LKS",
            Self::Moves => "MOV",
            Self::Worlds => "WLD",
            Self::Branded => "BRD",
            Self::Personalize => "PRS",
            Self::TrainingData => "TRN",
            Self::Composite => "CMP",
            Self::Rights => "RGT",
        }
    }

    pub const fn numeric(self) -> u8 {
        match self {
            Self::Songs => 1,
            Self::Stars => 2,
            Self::Looks => 3,
            Self::Moves => 4,
            Self::Worlds => 5,
            Self::Branded => 6,
            Self::Personalize => 7,
            Self::TrainingData => 8,
            Self::Composite => 9,
            Self::Rights => 10,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Songs => "Songs",
            Self::Stars => "Stars",
            Self::Looks => "Looks",
            Self::Moves => "Moves",
            Self::Worlds => "Worlds",
            Self::Branded => "Branded",
            Self::Personalize => "Personalize",
            Self::TrainingData => "Training Data",
            Self::Composite => "Composite",
            Self::Rights => "Rights",
        }
    }

    pub fn from_numeric(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.numeric() == value)
    }

    /// Parse any accepted form: short, long, numeric (any padding) or display name.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed
                .parse::<u8>()
                .ok()
                .and_then(Self::from_numeric)
                .ok_or_else(|| RegistryError::InvalidLayer(raw.to_string()));
        }

        Self::ALL
            .into_iter()
            .find(|l| {
                l.code().eq_ignore_ascii_case(trimmed)
                    || l.long_code().eq_ignore_ascii_case(trimmed)
                    || l.name().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| RegistryError::InvalidLayer(raw.to_string()))
    }

    #[inline]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::Composite)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Layer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Layer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_forms() {
        assert_eq!(Layer::parse("S").unwrap(), Layer::Stars);
        assert_eq!(Layer::parse("s").unwrap(), Layer::Stars);
        assert_eq!(Layer::parse("STR").unwrap(), Layer::Stars);
        assert_eq!(Layer::parse("2").unwrap(), Layer::Stars);
        assert_eq!(Layer::parse("002").unwrap(), Layer::Stars);
        assert_eq!(Layer::parse("training data").unwrap(), Layer::TrainingData);
        assert_eq!(Layer::parse("10").unwrap(), Layer::Rights);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(Layer::parse("X").is_err());
        assert!(Layer::parse("0").is_err());
        assert!(Layer::parse("11").is_err());
        assert!(Layer::parse("").is_err());
    }

    #[test]
    fn test_codes_are_unique() {
        for (i, a) in Layer::ALL.iter().enumerate() {
            assert_eq!(a.numeric() as usize, i + 1);
            for b in &Layer::ALL[i + 1..] {
                assert_ne!(a.code(), b.code());
                assert_ne!(a.long_code(), b.long_code());
            }
        }
    }
}
