//! Storage backend abstraction.

use compact_str::CompactString;

use crate::error::BackendError;

/// Kind of entry returned by a backend listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Leaf object. `size` is `None` when the backend cannot report it.
    File { size: Option<u64> },
    /// Sub-directory that can itself be listed.
    Directory,
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Check if this is a leaf object.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File { .. })
    }
}

/// One entry in a directory listing.
#[derive(Debug, Clone)]
pub struct BackendEntry {
    /// Entry name within its parent (not a full path).
    pub name: CompactString,
    /// Entry kind and associated metadata.
    pub kind: EntryKind,
}

impl BackendEntry {
    /// Create a leaf entry with a known or unknown size.
    pub fn file(name: impl Into<CompactString>, size: Option<u64>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File { size },
        }
    }

    /// Create a directory entry.
    pub fn directory(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }
}

/// A storage backend that can be listed and mutated.
///
/// Listings are pulled on demand by the discovery engine. `delete_file` and
/// `purge` are invoked synchronously from the controller after the user
/// confirms a deletion; implementations may block.
pub trait Backend: Send + Sync {
    /// Human name of the backend, used as the display-path prefix.
    fn name(&self) -> String;

    /// List the direct children of `path` (`""` is the root).
    fn list(&self, path: &str) -> Result<Vec<BackendEntry>, BackendError>;

    /// Delete a single leaf object.
    fn delete_file(&self, path: &str) -> Result<(), BackendError>;

    /// Recursively delete a directory and everything under it.
    fn purge(&self, path: &str) -> Result<(), BackendError>;
}

/// Join an entry name onto a backend-relative parent path.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// Join a backend-relative path onto the backend's display name.
pub fn display_path(backend_name: &str, path: &str) -> String {
    if path.is_empty() {
        backend_name.to_string()
    } else {
        format!("{backend_name}/{path}")
    }
}
