//! Local filesystem backend.

use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::{Backend, BackendEntry};
use crate::error::BackendError;

/// Backend over a local directory tree.
///
/// Symlinks are listed as leaf objects with their own metadata size and are
/// never followed.
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Create a backend rooted at `root`. The path must be an existing
    /// directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, BackendError> {
        let root = root
            .as_ref()
            .canonicalize()
            .map_err(|e| BackendError::io(root.as_ref().display().to_string(), e))?;
        if !root.is_dir() {
            return Err(BackendError::NotADirectory {
                path: root.display().to_string(),
            });
        }
        Ok(Self { root })
    }

    fn resolve(&self, path: &str) -> PathBuf {
        if path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }
}

impl Backend for LocalBackend {
    fn name(&self) -> String {
        self.root.display().to_string()
    }

    fn list(&self, path: &str) -> Result<Vec<BackendEntry>, BackendError> {
        let full = self.resolve(path);
        let mut entries = Vec::new();
        for item in fs::read_dir(&full).map_err(|e| BackendError::io(path, e))? {
            let item = item.map_err(|e| BackendError::io(path, e))?;
            let name = item.file_name().to_string_lossy().into_owned();
            let file_type = item.file_type().map_err(|e| BackendError::io(path, e))?;
            if file_type.is_dir() {
                entries.push(BackendEntry::directory(name));
            } else {
                // symlink_metadata so a dangling link still lists, with its
                // size reported as unknown
                let size = fs::symlink_metadata(item.path()).map(|m| m.len()).ok();
                entries.push(BackendEntry::file(name, size));
            }
        }
        Ok(entries)
    }

    fn delete_file(&self, path: &str) -> Result<(), BackendError> {
        fs::remove_file(self.resolve(path)).map_err(|e| BackendError::io(path, e))
    }

    fn purge(&self, path: &str) -> Result<(), BackendError> {
        fs::remove_dir_all(self.resolve(path)).map_err(|e| BackendError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::EntryKind;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("dir1")).unwrap();
        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world").unwrap();
        temp
    }

    #[test]
    fn test_list_root() {
        let temp = create_test_tree();
        let backend = LocalBackend::new(temp.path()).unwrap();

        let mut entries = backend.list("").unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "dir1");
        assert!(entries[0].kind.is_dir());
        assert_eq!(entries[1].name, "file1.txt");
        assert_eq!(entries[1].kind, EntryKind::File { size: Some(5) });
    }

    #[test]
    fn test_list_missing_is_not_found() {
        let temp = create_test_tree();
        let backend = LocalBackend::new(temp.path()).unwrap();
        assert!(matches!(
            backend.list("no-such-dir"),
            Err(BackendError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete_and_purge() {
        let temp = create_test_tree();
        let backend = LocalBackend::new(temp.path()).unwrap();

        backend.delete_file("file1.txt").unwrap();
        assert!(!temp.path().join("file1.txt").exists());

        backend.purge("dir1").unwrap();
        assert!(!temp.path().join("dir1").exists());
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp = create_test_tree();
        assert!(matches!(
            LocalBackend::new(temp.path().join("file1.txt")),
            Err(BackendError::NotADirectory { .. })
        ));
    }
}
