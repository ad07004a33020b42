//! Recursive directory discovery under the configured library root.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::ScanError;

/// Expand a leading `~` to the user's home directory.
///
/// Paths without the shorthand, or on systems without a resolvable home,
/// come back unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };
    if raw == "~" {
        return dirs::home_dir().unwrap_or_else(|| path.to_path_buf());
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Enumerate `root` and every directory below it, root first, each once.
///
/// Unreadable entries are skipped with a warning; they never abort the
/// scan. Symlinks are not followed.
pub fn scan_directories(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let root = expand_home(root);
    if !root.is_dir() {
        return Err(ScanError::NotFound { path: root });
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(&root) {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => found.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => warn!("skipping unreadable entry under '{}': {}", root.display(), e),
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn scan_includes_root_and_all_descendants_once() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::create_dir(root.join("c")).unwrap();
        fs::write(root.join("a/track.m4a"), b"").unwrap();

        let mut found = scan_directories(root).unwrap();
        assert_eq!(found[0], root);
        found.sort();
        let mut expected = vec![
            root.to_path_buf(),
            root.join("a"),
            root.join("a/b"),
            root.join("c"),
        ];
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn scan_missing_root_fails() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let err = scan_directories(&missing).unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
    }

    #[test]
    fn scan_rejects_plain_files() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not-a-dir");
        fs::write(&file, b"").unwrap();
        assert!(scan_directories(&file).is_err());
    }

    #[test]
    fn expand_home_leaves_plain_paths_alone() {
        assert_eq!(expand_home(Path::new("/music")), PathBuf::from("/music"));
        assert_eq!(expand_home(Path::new("music")), PathBuf::from("music"));
    }

    #[test]
    fn expand_home_resolves_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~")), home);
            assert_eq!(expand_home(Path::new("~/music")), home.join("music"));
        }
    }
}
