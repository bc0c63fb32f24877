//! Process-local counter store.

use dashmap::DashMap;

use super::{CounterStore, PathKey};
use crate::error::Result;

/// Counters in a sharded map; different paths never share a lock.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    counters: DashMap<PathKey, u32>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for MemoryCounterStore {
    fn current(&self, key: &PathKey) -> Result<u32> {
        Ok(self.counters.get(key).map_or(0, |v| *v))
    }

    fn compare_and_set(&self, key: &PathKey, expected: u32, new: u32) -> Result<bool> {
        // The entry guard holds the shard lock for the whole check-and-write.
        let mut entry = self.counters.entry(key.clone()).or_insert(0);
        if *entry != expected {
            return Ok(false);
        }
        *entry = new;
        Ok(true)
    }

    fn clear(&self, key: &PathKey) -> Result<()> {
        self.counters.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_and_set() {
        let store = MemoryCounterStore::new();
        let key = PathKey("S.POP.HPM".into());

        assert_eq!(store.current(&key).unwrap(), 0);
        assert!(store.compare_and_set(&key, 0, 1).unwrap());
        assert!(!store.compare_and_set(&key, 0, 1).unwrap());
        assert_eq!(store.current(&key).unwrap(), 1);

        store.clear(&key).unwrap();
        assert_eq!(store.current(&key).unwrap(), 0);
    }
}
