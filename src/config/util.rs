//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from the current directory.
///
/// ```text
/// /srv/assets/stars/pop/     ← cwd
/// /srv/assets/registry.toml  ← found
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }
    let cwd = std::env::current_dir().ok()?;
    find_config_from(&cwd, config_name)
}

fn find_config_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}

/// Absolute, canonical when the path exists.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_config_walks_upward() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("registry.toml"), "").unwrap();

        let found = find_config_from(&nested, Path::new("registry.toml")).unwrap();
        assert_eq!(found, dir.path().join("registry.toml"));
    }

    #[test]
    fn test_find_config_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config_from(dir.path(), Path::new("no-such-registry.toml")).is_none());
    }

    #[test]
    fn test_normalize_absolute_missing_path() {
        let path = Path::new("/definitely/not/here");
        assert_eq!(normalize_path(path), path);
    }
}
