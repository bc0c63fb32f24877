//! Directory-backed counter store.
//!
//! ```text
//! .nna/counters/
//! ├── S.POP.HPM.json   {"path": "S.POP.HPM", "count": 3}
//! └── G.POP.TSW.json
//! ```
//!
//! Writes go to a temporary sibling, are flushed with `sync_all`, then
//! renamed over the counter file, so a reader sees either the old or the
//! new value and never a torn one.
//!
//! Compare-and-set holds an exclusive OS lock on `<path>.lock` for the
//! whole read-check-write, so separate processes sharing the directory
//! never issue the same value.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use fs2::FileExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::{CounterStore, PathKey};
use crate::debug;
use crate::error::{RegistryError, Result};

#[derive(Debug, Serialize, Deserialize)]
struct CounterFile {
    path: String,
    count: u32,
}

/// Distinguishes temp files of concurrent writers in one process.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
pub struct FileCounterStore {
    dir: PathBuf,
    locks: DashMap<PathKey, Arc<Mutex<()>>>,
}

impl FileCounterStore {
    /// Open (and create if needed) a counter directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| RegistryError::io(&dir, e))?;
        Ok(Self {
            dir,
            locks: DashMap::new(),
        })
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, key: &PathKey) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn lock_for(&self, key: &PathKey) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.entry(key.clone()).or_default().value())
    }

    /// Exclusive lock on the path's lock file, released when the handle drops.
    fn lock_file(&self, key: &PathKey) -> Result<File> {
        let path = self.dir.join(format!("{key}.lock"));
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| RegistryError::io(&path, e))?;
        file.lock_exclusive().map_err(|e| RegistryError::io(&path, e))?;
        Ok(file)
    }

    fn read(&self, key: &PathKey) -> Result<u32> {
        let path = self.file_for(key);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(RegistryError::io(&path, e)),
        };
        let file: CounterFile = serde_json::from_str(&json)
            .map_err(|e| RegistryError::io(&path, std::io::Error::new(ErrorKind::InvalidData, e)))?;
        Ok(file.count)
    }

    fn write(&self, key: &PathKey, count: u32) -> Result<()> {
        let path = self.file_for(key);
        let tmp = self.dir.join(format!(
            "{key}.json.{}.{}.tmp",
            std::process::id(),
            TMP_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        let json = serde_json::to_string_pretty(&CounterFile {
            path: key.to_string(),
            count,
        })?;

        let mut file = File::create(&tmp).map_err(|e| RegistryError::io(&tmp, e))?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| RegistryError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| RegistryError::io(&path, e))?;
        self.sync_dir()?;
        debug!("counter"; "{} = {}", key, count);
        Ok(())
    }

    /// Persist the directory entry created by `rename`.
    #[cfg(unix)]
    fn sync_dir(&self) -> Result<()> {
        File::open(&self.dir)
            .and_then(|dir| dir.sync_all())
            .map_err(|e| RegistryError::io(&self.dir, e))
    }

    #[cfg(not(unix))]
    fn sync_dir(&self) -> Result<()> {
        Ok(())
    }
}

impl CounterStore for FileCounterStore {
    fn current(&self, key: &PathKey) -> Result<u32> {
        let lock = self.lock_for(key);
        let _guard = lock.lock();
        self.read(key)
    }

    fn compare_and_set(&self, key: &PathKey, expected: u32, new: u32) -> Result<bool> {
        let lock = self.lock_for(key);
        let _guard = lock.lock();
        let _flock = self.lock_file(key)?;
        if self.read(key)? != expected {
            return Ok(false);
        }
        self.write(key, new)?;
        Ok(true)
    }

    fn clear(&self, key: &PathKey) -> Result<()> {
        let lock = self.lock_for(key);
        let _guard = lock.lock();
        let _flock = self.lock_file(key)?;
        let path = self.file_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RegistryError::io(&path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::SequenceAllocator;

    fn key(raw: &str) -> PathKey {
        PathKey(raw.into())
    }

    #[test]
    fn test_counter_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let k = key("S.POP.HPM");

        let store = FileCounterStore::open(dir.path().join("counters")).unwrap();
        assert_eq!(store.current(&k).unwrap(), 0);
        assert!(store.compare_and_set(&k, 0, 1).unwrap());
        assert!(store.compare_and_set(&k, 1, 2).unwrap());
        assert!(!store.compare_and_set(&k, 1, 2).unwrap());
        drop(store);

        let reopened = FileCounterStore::open(dir.path().join("counters")).unwrap();
        assert_eq!(reopened.current(&k).unwrap(), 2);
        assert!(dir.path().join("counters/S.POP.HPM.json").is_file());
        let leftovers = fs::read_dir(dir.path().join("counters"))
            .unwrap()
            .filter(|e| e.as_ref().unwrap().path().extension().is_some_and(|x| x == "tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCounterStore::open(dir.path()).unwrap();
        let k = key("G.POP.TSW");

        store.compare_and_set(&k, 0, 5).unwrap();
        store.clear(&k).unwrap();
        assert_eq!(store.current(&k).unwrap(), 0);
        // Clearing twice is fine.
        store.clear(&k).unwrap();
    }

    #[test]
    fn test_corrupt_counter_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCounterStore::open(dir.path()).unwrap();
        let path = dir.path().join("S.POP.BAS.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            store.current(&key("S.POP.BAS")),
            Err(RegistryError::Io(ref p, ref e)) if *p == path && e.kind() == ErrorKind::InvalidData
        ));
    }

    #[test]
    fn test_concurrent_file_allocation() {
        let dir = tempfile::tempdir().unwrap();
        let alloc = SequenceAllocator::new(FileCounterStore::open(dir.path()).unwrap())
            .with_max_retries(u32::MAX);
        let k = key("M.POP.TIK");

        let mut issued: Vec<u32> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| (0..10).map(|_| alloc.next_for(&k).unwrap().value()).collect::<Vec<_>>()))
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });
        issued.sort_unstable();
        assert_eq!(issued, (1..=40).collect::<Vec<_>>());
    }

    #[test]
    fn test_separate_stores_share_one_directory() {
        let dir = tempfile::tempdir().unwrap();
        let k = key("S.POP.HPM");

        let mut issued: Vec<u32> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let store = FileCounterStore::open(dir.path()).unwrap();
                    let k = &k;
                    s.spawn(move || {
                        let alloc = SequenceAllocator::new(store).with_max_retries(u32::MAX);
                        (0..25).map(|_| alloc.next_for(k).unwrap().value()).collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });
        issued.sort_unstable();
        assert_eq!(issued, (1..=100).collect::<Vec<_>>());

        let reopened = FileCounterStore::open(dir.path()).unwrap();
        assert_eq!(reopened.current(&k).unwrap(), 100);
    }
}
