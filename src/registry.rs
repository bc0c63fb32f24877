//! Registry facade: validate, allocate, encode.
//!
//! ```text
//! (layer, category, subcategory)
//!        │
//!        ├─► Validator          canonical path or error
//!        ├─► SequenceAllocator  next number for that path
//!        └─► AddressCodec       HFN + MFA from the same path
//! ```
//!
//! The taxonomy snapshot is taken once per call, so a concurrent refresh
//! cannot make the two renderings disagree.

use std::sync::Arc;

use crate::address::{Address, AddressPair, Sequential, Suffix, check_suffix};
use crate::config::{RegistryConfig, StoreKind};
use crate::error::Result;
use crate::sequence::{CounterStore, FileCounterStore, MemoryCounterStore, SequenceAllocator};
use crate::taxonomy::{ResolvedPath, Taxonomy, TaxonomyHandle, load_taxonomy};

pub struct Registry {
    taxonomy: TaxonomyHandle,
    allocator: SequenceAllocator<Box<dyn CounterStore>>,
}

impl Registry {
    pub fn new(taxonomy: Taxonomy, store: Box<dyn CounterStore>) -> Self {
        Self {
            taxonomy: TaxonomyHandle::new(taxonomy),
            allocator: SequenceAllocator::new(store),
        }
    }

    /// Build from configuration: taxonomy sources plus the counter store.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let taxonomy = load_taxonomy(&config.catalog)?;
        let store: Box<dyn CounterStore> = match config.sequence.store {
            StoreKind::File => Box::new(FileCounterStore::open(&config.sequence.dir)?),
            StoreKind::Memory => Box::new(MemoryCounterStore::new()),
        };
        Ok(Self::new(taxonomy, store).with_max_retries(config.sequence.max_retries))
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.allocator = self.allocator.with_max_retries(max_retries);
        self
    }

    #[inline]
    pub fn taxonomy(&self) -> Arc<Taxonomy> {
        self.taxonomy.load()
    }

    #[inline]
    pub fn handle(&self) -> &TaxonomyHandle {
        &self.taxonomy
    }

    #[inline]
    pub fn allocator(&self) -> &SequenceAllocator<Box<dyn CounterStore>> {
        &self.allocator
    }

    pub fn validate(&self, layer: &str, category: &str, subcategory: &str) -> Result<ResolvedPath> {
        self.taxonomy().validator().validate(layer, category, subcategory)
    }

    /// Encode an address, allocating the sequential when none is given.
    pub fn encode(
        &self,
        layer: &str,
        category: &str,
        subcategory: &str,
        sequential: Option<Sequential>,
        suffix: Option<Suffix>,
    ) -> Result<AddressPair> {
        let taxonomy = self.taxonomy();
        let path = taxonomy.validator().validate(layer, category, subcategory)?;
        // Reject a bad suffix before a number is burned.
        check_suffix(&path, suffix.as_ref())?;

        let sequential = match sequential {
            Some(sequential) => sequential,
            None => self.allocator.next(&path)?,
        };
        Ok(Address {
            path,
            sequential,
            suffix,
        }
        .pair())
    }

    /// Mint a new address: always allocates.
    pub fn register(
        &self,
        layer: &str,
        category: &str,
        subcategory: &str,
        suffix: Option<Suffix>,
    ) -> Result<AddressPair> {
        self.encode(layer, category, subcategory, None, suffix)
    }

    pub fn hfn_to_mfa(&self, hfn: &str) -> String {
        self.taxonomy().codec().hfn_to_mfa(hfn)
    }

    pub fn mfa_to_hfn(&self, mfa: &str) -> String {
        self.taxonomy().codec().mfa_to_hfn(mfa)
    }
}
