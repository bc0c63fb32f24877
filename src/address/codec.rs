//! HFN <-> MFA conversion.
//!
//! ```text
//! HFN   S.POP.HPM.003[.ext][:<addr>+<addr>...]
//!       │  │   │   └── sequential, copied verbatim
//!       │  │   └────── subcategory: overrides, then tree
//!       │  └────────── category:    tree
//!       └───────────── layer:       closed set
//! MFA   2.001.007.003[.ext][:<addr>+<addr>...]
//! ```
//!
//! String conversion is lenient: fewer than four segments returns the
//! input unchanged, and codes that do not resolve are carried through
//! as written. [`AddressCodec::parse`] is the strict counterpart.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Address, AddressForm, AddressPair, Sequential, Suffix};
use crate::error::{RegistryError, Result};
use crate::taxonomy::{Layer, ResolvedPath, Taxonomy};

static RE_HFN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z](?:[A-Z0-9]{2})?\.[A-Z0-9]{3}\.[A-Z0-9]{3}\.\d{3,}(?:\.[A-Za-z0-9]+)?$")
        .expect("valid HFN pattern")
});

static RE_MFA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}\.\d{3}\.\d{3}\.\d{3,}(?:\.[A-Za-z0-9]+)?$").expect("valid MFA pattern")
});

/// Minimum dot segments: layer, category, subcategory, sequential.
const MIN_SEGMENTS: usize = 4;

/// Address codec over a borrowed taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct AddressCodec<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> AddressCodec<'a> {
    pub const fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    // ========================================================================
    // encoding
    // ========================================================================

    /// Build both forms of one address from a taxonomy triple.
    ///
    /// The triple is validated first; each code may be given in either form.
    pub fn encode(
        &self,
        layer: &str,
        category: &str,
        subcategory: &str,
        sequential: Sequential,
        suffix: Option<Suffix>,
    ) -> Result<AddressPair> {
        let path = self.taxonomy.validator().validate(layer, category, subcategory)?;

        check_suffix(&path, suffix.as_ref())?;

        let address = Address {
            path,
            sequential,
            suffix,
        };
        Ok(address.pair())
    }

    // ========================================================================
    // string conversion
    // ========================================================================

    pub fn hfn_to_mfa(&self, hfn: &str) -> String {
        self.convert(hfn, AddressForm::Mfa)
    }

    pub fn mfa_to_hfn(&self, mfa: &str) -> String {
        self.convert(mfa, AddressForm::Hfn)
    }

    /// Rewrite the first three segments into `target` form.
    ///
    /// Layer codes and unresolvable segments keep their raw text. The
    /// sequential and everything after it are copied verbatim.
    pub fn convert(&self, address: &str, target: AddressForm) -> String {
        let (base, tail) = split_components(address);
        let segments: Vec<&str> = base.split('.').collect();
        if segments.len() < MIN_SEGMENTS {
            return address.to_string();
        }

        let (layer_raw, category_raw, subcategory_raw) = (segments[0], segments[1], segments[2]);
        let Ok(layer) = Layer::parse(layer_raw) else {
            return address.to_string();
        };

        let (layer_out, category_out, subcategory_out) = match target {
            AddressForm::Mfa => (
                layer.numeric().to_string(),
                self.taxonomy.category_to_numeric(layer, category_raw).display(),
                self.taxonomy
                    .subcategory_to_numeric(layer, category_raw, subcategory_raw)
                    .display(),
            ),
            AddressForm::Hfn => (
                layer.code().to_string(),
                self.taxonomy.category_to_alpha(layer, category_raw).display(),
                self.taxonomy
                    .subcategory_to_alpha(layer, category_raw, subcategory_raw)
                    .display(),
            ),
        };

        let mut out = [layer_out, category_out, subcategory_out].join(".");
        for rest in &segments[3..] {
            out.push('.');
            out.push_str(rest);
        }
        out.push_str(tail);
        out
    }

    // ========================================================================
    // strict parsing
    // ========================================================================

    /// Parse either form into a fully resolved [`Address`].
    pub fn parse(&self, address: &str) -> Result<Address> {
        let malformed = || RegistryError::MalformedAddress(address.to_string());

        let trimmed = address.trim();
        let (base, tail) = split_components(trimmed);
        let segments: Vec<&str> = base.split('.').collect();
        if segments.len() < MIN_SEGMENTS || segments.len() > MIN_SEGMENTS + 1 {
            return Err(malformed());
        }

        let path = self
            .taxonomy
            .validator()
            .validate(segments[0], segments[1], segments[2])?;
        let sequential = Sequential::parse(segments[3])?;

        let suffix = match (segments.get(4), tail.strip_prefix(':')) {
            (Some(_), Some(_)) => return Err(malformed()),
            (Some(ext), None) => Some(Suffix::extension(ext)?),
            (None, Some(list)) => {
                if !path.layer.is_composite() {
                    return Err(RegistryError::InvalidSuffix(format!(
                        "`{trimmed}` carries components outside the {} layer",
                        Layer::Composite.name()
                    )));
                }
                Some(Suffix::components(list.split('+'))?)
            }
            (None, None) => None,
        };

        Ok(Address {
            path,
            sequential,
            suffix,
        })
    }

    /// Whether two strings, in any form, name the same logical address.
    pub fn equivalent(&self, a: &str, b: &str) -> Result<bool> {
        Ok(self.parse(a)?.is_equivalent(&self.parse(b)?))
    }

    /// Shape-only form detection; `None` when neither pattern matches.
    pub fn detect(address: &str) -> Option<AddressForm> {
        let (base, _) = split_components(address.trim());
        if RE_MFA.is_match(base) {
            Some(AddressForm::Mfa)
        } else if RE_HFN.is_match(base) {
            Some(AddressForm::Hfn)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_hfn(address: &str) -> bool {
        Self::detect(address) == Some(AddressForm::Hfn)
    }

    #[inline]
    pub fn is_mfa(address: &str) -> bool {
        Self::detect(address) == Some(AddressForm::Mfa)
    }
}

/// Component lists belong to composite addresses only.
pub(crate) fn check_suffix(path: &ResolvedPath, suffix: Option<&Suffix>) -> Result<()> {
    match suffix {
        Some(Suffix::Components(_)) if !path.layer.is_composite() => {
            Err(RegistryError::InvalidSuffix(format!(
                "component lists are only allowed on the {} layer, not {}",
                Layer::Composite.name(),
                path.layer.name()
            )))
        }
        _ => Ok(()),
    }
}

/// Split `base:components` at the first colon; the tail keeps the colon.
fn split_components(address: &str) -> (&str, &str) {
    match address.find(':') {
        Some(i) => address.split_at(i),
        None => (address, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    fn bundled() -> Taxonomy {
        Taxonomy::bundled().unwrap()
    }

    #[test]
    fn test_encode_override_subcategory() {
        let t = bundled();
        let pair = t
            .codec()
            .encode("S", "POP", "HPM", Sequential::parse("003").unwrap(), None)
            .unwrap();
        assert_eq!(pair.hfn, "S.POP.HPM.003");
        assert_eq!(pair.mfa, "2.001.007.003");
        assert_eq!(t.codec().mfa_to_hfn("2.001.007.003"), "S.POP.HPM.003");
    }

    #[test]
    fn test_encode_songs() {
        let t = bundled();
        let pair = t
            .codec()
            .encode("G", "POP", "TSW", Sequential::FIRST, None)
            .unwrap();
        assert_eq!(pair.hfn, "G.POP.TSW.001");
        assert_eq!(pair.mfa, "1.001.012.001");
    }

    #[test]
    fn test_encode_accepts_mixed_forms() {
        let t = bundled();
        let pair = t
            .codec()
            .encode("2", "pop", "007", Sequential::new(3), Suffix::extension("png").ok())
            .unwrap();
        assert_eq!(pair.hfn, "S.POP.HPM.003.png");
        assert_eq!(pair.mfa, "2.001.007.003.png");
    }

    #[test]
    fn test_encode_rejects_invalid_triple() {
        let t = bundled();
        let err = t
            .codec()
            .encode("S", "POP", "ZZZ", Sequential::FIRST, None)
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidSubcategory { .. }));
    }

    #[test]
    fn test_encode_composite() {
        let t = bundled();
        let components = Suffix::components(["2.001.007.003", "1.001.012.001"]).unwrap();
        let pair = t
            .codec()
            .encode("C", "RMX", "BAS", Sequential::FIRST, Some(components.clone()))
            .unwrap();
        assert!(pair.hfn.ends_with(":2.001.007.003+1.001.012.001"));
        assert!(pair.mfa.starts_with("9."));
        assert_eq!(t.codec().hfn_to_mfa(&pair.hfn), pair.mfa);
        assert_eq!(t.codec().mfa_to_hfn(&pair.mfa), pair.hfn);

        let err = t
            .codec()
            .encode("S", "POP", "BAS", Sequential::FIRST, Some(components))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidSuffix(_)));
    }

    #[test]
    fn test_short_input_unchanged() {
        let t = bundled();
        assert_eq!(t.codec().hfn_to_mfa("G.POP"), "G.POP");
        assert_eq!(t.codec().mfa_to_hfn("1.001.012"), "1.001.012");
        assert_eq!(t.codec().hfn_to_mfa(""), "");
    }

    #[test]
    fn test_unknown_codes_pass_through() {
        let t = bundled();
        assert_eq!(t.codec().hfn_to_mfa("S.POP.ZZZ.001"), "2.001.ZZZ.001");
        assert_eq!(t.codec().mfa_to_hfn("2.001.999.001"), "S.POP.999.001");
        assert_eq!(t.codec().hfn_to_mfa("S.XYZ.BAS.001"), "2.XYZ.BAS.001");
        assert_eq!(t.codec().hfn_to_mfa("Q.POP.BAS.001"), "Q.POP.BAS.001");
    }

    #[test]
    fn test_conversion_is_idempotent() {
        let t = bundled();
        let codec = t.codec();
        assert_eq!(codec.hfn_to_mfa("2.001.007.003"), "2.001.007.003");
        assert_eq!(codec.mfa_to_hfn("S.POP.HPM.003"), "S.POP.HPM.003");
    }

    #[test]
    fn test_override_precedence_in_codec() {
        let t = bundled();
        // Catalog says 004; the override wins.
        assert_eq!(t.codec().hfn_to_mfa("M.POP.TIK.010"), "4.001.009.010");
        assert_eq!(t.codec().mfa_to_hfn("4.001.009.010"), "M.POP.TIK.010");
        // The stale catalog numeric no longer names TIK.
        assert_ne!(t.codec().mfa_to_hfn("4.001.004.010"), "M.POP.TIK.010");
    }

    #[test]
    fn test_long_layer_code_input() {
        let t = bundled();
        assert_eq!(t.codec().hfn_to_mfa("STR.POP.HPM.003"), "2.001.007.003");
    }

    #[test]
    fn test_round_trip_every_path() {
        let t = bundled();
        let codec = t.codec();
        let mut prefixes = Vec::new();
        for layer in t.tree().layers() {
            for cat in layer.categories() {
                for sub in t.effective_subcategories(layer.layer, cat) {
                    prefixes.push(format!("{}.{}.{}", layer.layer.code(), cat.code(), sub.code));
                }
            }
        }
        assert!(!prefixes.is_empty());

        prefixes.par_iter().for_each(|prefix| {
            for n in 1..=999 {
                let hfn = format!("{prefix}.{}", Sequential::new(n));
                let mfa = codec.hfn_to_mfa(&hfn);
                assert!(AddressCodec::is_mfa(&mfa), "{hfn} -> {mfa}");
                assert_eq!(codec.mfa_to_hfn(&mfa), hfn);
                assert_eq!(codec.hfn_to_mfa(&codec.mfa_to_hfn(&mfa)), mfa);
            }
        });
    }

    #[test]
    fn test_parse_and_equivalent() {
        let t = bundled();
        let codec = t.codec();

        let address = codec.parse("S.POP.HPM.003.png").unwrap();
        assert_eq!(address.mfa(), "2.001.007.003.png");
        assert_eq!(address.suffix, Some(Suffix::Extension("png".into())));

        assert!(codec.equivalent("S.POP.HPM.003", "2.001.007.003").unwrap());
        assert!(codec.equivalent("S.POP.HIP.3", "2.001.007.003").unwrap());
        assert!(!codec.equivalent("S.POP.HPM.003", "2.001.007.004").unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let t = bundled();
        let codec = t.codec();
        assert!(matches!(codec.parse("G.POP"), Err(RegistryError::MalformedAddress(_))));
        assert!(matches!(
            codec.parse("G.POP.TSW.001.a.b"),
            Err(RegistryError::MalformedAddress(_))
        ));
        assert!(matches!(
            codec.parse("G.POP.TSW.x01"),
            Err(RegistryError::InvalidSequential(_))
        ));
        assert!(matches!(
            codec.parse("G.POP.TSW.001:2.001.007.003"),
            Err(RegistryError::InvalidSuffix(_))
        ));
        let composite = codec.parse("C.RMX.BAS.002:2.001.007.003+G.POP.TSW.001").unwrap();
        assert_eq!(
            composite.suffix,
            Some(Suffix::Components(vec!["2.001.007.003".into(), "G.POP.TSW.001".into()]))
        );
    }

    #[test]
    fn test_detect() {
        assert_eq!(AddressCodec::detect("S.POP.HPM.003"), Some(AddressForm::Hfn));
        assert_eq!(AddressCodec::detect("STR.POP.HPM.003.mp4"), Some(AddressForm::Hfn));
        assert_eq!(AddressCodec::detect("2.001.007.003"), Some(AddressForm::Mfa));
        assert_eq!(AddressCodec::detect("10.001.001.1000"), Some(AddressForm::Mfa));
        assert_eq!(AddressCodec::detect("9.001.001.001:2.001.007.003"), Some(AddressForm::Mfa));
        assert_eq!(AddressCodec::detect("G.POP"), None);
        assert!(AddressCodec::is_hfn("G.POP.TSW.001"));
        assert!(!AddressCodec::is_mfa("G.POP.TSW.001"));
    }
}
