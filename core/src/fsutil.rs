//! Filesystem helpers: project-root discovery and atomic file writes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Walk up from `start` (or the current directory) looking for a directory
/// containing one of the marker entries. Falls back to the start path when no
/// marker is found.
pub fn find_project_root(markers: &[&str], start: Option<&Path>) -> PathBuf {
    let current = match start {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    for dir in current.ancestors() {
        if markers.iter().any(|m| dir.join(m).exists()) {
            return dir.to_path_buf();
        }
    }
    current
}

/// Default markers used to locate the repository root.
pub fn default_project_root() -> PathBuf {
    find_project_root(&["Cargo.toml", ".git"], None)
}

/// Write `contents` to `path` via a temporary sibling and an atomic rename.
/// The scanner container may start reading the file before this process
/// exits, so the final name must never expose a partial write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let tmp = tmp_sibling(path);
    if let Err(e) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    match fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

/// Temporary sibling path used by atomic writes: `<name>.tmp` in the same
/// directory, so the rename never crosses a filesystem boundary.
pub fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_root_by_marker() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]").unwrap();
        let nested = dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        let root = find_project_root(&["Cargo.toml"], Some(&nested));
        assert_eq!(root, dir.path());
    }

    #[test]
    fn falls_back_to_start_without_marker() {
        let dir = tempfile::tempdir().unwrap();
        let root = find_project_root(&["no-such-marker-file"], Some(dir.path()));
        assert_eq!(root, dir.path());
    }

    #[test]
    fn atomic_write_replaces_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("plan.yaml");
        fs::write(&target, "old").unwrap();
        write_atomic(&target, b"new contents").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new contents");
        assert!(!tmp_sibling(&target).exists());
    }
}
