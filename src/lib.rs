//! NNA asset registry.
//!
//! Every asset gets two addresses describing one taxonomy path:
//!
//! ```text
//! HFN  S.POP.HPM.003   Stars / Pop / Hipster Male, instance 3
//! MFA  2.001.007.003
//! ```
//!
//! # Module Structure
//!
//! | Module     | Purpose                                          |
//! |------------|--------------------------------------------------|
//! | `taxonomy` | Catalog tree, code resolution, overrides, audit  |
//! | `address`  | HFN/MFA types and the codec between them         |
//! | `sequence` | Per-path sequential allocation and stores        |
//! | `registry` | Validate, allocate and encode in one call        |
//! | `config`   | `registry.toml` loading and diagnostics          |
//! | `cli`      | The `nna` command line                           |

pub mod address;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod registry;
pub mod sequence;
pub mod taxonomy;
pub mod utils;

pub use address::{Address, AddressCodec, AddressForm, AddressPair, Sequential, Suffix};
pub use error::{RegistryError, Result};
pub use registry::Registry;
pub use taxonomy::{Layer, Taxonomy, TaxonomyHandle};
