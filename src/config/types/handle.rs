//! Global config handle.
//!
//! Uses `arc-swap` so command code can read the active configuration
//! from anywhere without threading it through every call.

use crate::config::RegistryConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

static CONFIG: LazyLock<ArcSwap<RegistryConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(RegistryConfig::default()));

#[inline]
pub fn cfg() -> Arc<RegistryConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: RegistryConfig) -> Arc<RegistryConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_replaces_global() {
        let mut config = RegistryConfig::default();
        config.sequence.max_retries = 42;
        init_config(config);
        assert_eq!(cfg().sequence.max_retries, 42);
    }
}
