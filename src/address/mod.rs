//! Dual addressing: every asset has a human-friendly name (HFN) and a
//! machine-friendly address (MFA) describing the same taxonomy path.
//!
//! ```text
//! HFN  S.POP.HPM.003      alphabetic codes
//! MFA  2.001.007.003      numeric codes
//! ```
//!
//! - [`types`]: `Address`, `Sequential`, `Suffix`, `AddressPair`
//! - [`codec`]: `AddressCodec`, conversion and parsing

mod codec;
mod types;

pub use codec::AddressCodec;
pub(crate) use codec::check_suffix;
pub use types::{Address, AddressForm, AddressPair, Sequential, Suffix};
