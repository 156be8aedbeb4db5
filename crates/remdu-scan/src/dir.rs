//! Shared tree nodes produced by the discovery engine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use compact_str::CompactString;

use remdu_core::{join_path, BackendEntry, EntryKind};

/// Aggregate attributes for one entry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Attrs {
    /// Cumulative size in bytes. Grows while discovery is in progress.
    pub size: u64,
    /// Number of leaf objects in the subtree.
    pub count: u64,
    /// How many of those objects have an unknown size (counted as 0 bytes).
    pub count_unknown_size: u64,
    /// A descendant directory could not be read.
    pub entries_have_errors: bool,
    /// Whether this entry is a directory.
    pub is_dir: bool,
    /// Whether the directory's own listing has completed.
    pub readable: bool,
}

impl Attrs {
    /// Average object size, 0 when the subtree holds no objects.
    pub fn average_size(&self) -> f64 {
        if self.count > 0 {
            self.size as f64 / self.count as f64
        } else {
            0.0
        }
    }
}

/// One entry in a directory: a leaf object or a nested directory.
#[derive(Clone)]
pub enum Entry {
    /// Leaf object.
    File {
        name: CompactString,
        path: String,
        size: Option<u64>,
    },
    /// Nested directory.
    Dir { name: CompactString, dir: Arc<Dir> },
}

impl Entry {
    /// Entry name within its parent.
    pub fn name(&self) -> &str {
        match self {
            Entry::File { name, .. } => name,
            Entry::Dir { name, .. } => name,
        }
    }

    /// Backend-relative path, the entry's identity key.
    pub fn path(&self) -> String {
        match self {
            Entry::File { path, .. } => path.clone(),
            Entry::Dir { dir, .. } => dir.path(),
        }
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Dir { .. })
    }
}

/// A discovered directory, shared between the walker and the controller.
///
/// The walker mutates nodes while the controller reads them, so all state
/// sits behind a mutex and every accessor returns a snapshot. Two reads of
/// the same node in the same tick may observe different snapshots.
pub struct Dir {
    inner: Mutex<DirInner>,
}

struct DirInner {
    parent: Weak<Dir>,
    path: String,
    entries: Vec<Entry>,
    size: u64,
    count: u64,
    count_unknown_size: u64,
    entries_have_errors: bool,
    readable: bool,
    error: Option<String>,
}

impl Dir {
    /// Create the root node.
    pub fn new_root() -> Arc<Self> {
        Arc::new(Self::new(Weak::new(), String::new()))
    }

    fn new_child(parent: &Arc<Self>, path: String) -> Arc<Self> {
        Arc::new(Self::new(Arc::downgrade(parent), path))
    }

    fn new(parent: Weak<Dir>, path: String) -> Self {
        Self {
            inner: Mutex::new(DirInner {
                parent,
                path,
                entries: Vec::new(),
                size: 0,
                count: 0,
                count_unknown_size: 0,
                entries_have_errors: false,
                readable: false,
                error: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DirInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Backend-relative path of this directory (`""` for the root).
    pub fn path(&self) -> String {
        self.lock().path.clone()
    }

    /// Parent directory, `None` at the root.
    pub fn parent(&self) -> Option<Arc<Dir>> {
        self.lock().parent.upgrade()
    }

    /// Snapshot of the children in discovery order.
    pub fn entries(&self) -> Vec<Entry> {
        self.lock().entries.clone()
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Check if the directory has no children.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Aggregate attributes of this directory itself.
    pub fn attr(&self) -> Attrs {
        let inner = self.lock();
        Attrs {
            size: inner.size,
            count: inner.count,
            count_unknown_size: inner.count_unknown_size,
            entries_have_errors: inner.entries_have_errors,
            is_dir: true,
            readable: inner.readable,
        }
    }

    /// This directory's own listing error, if its listing failed.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Attributes of the child at `index`, plus the child's read-error text
    /// if its own listing failed. Out-of-range indices yield empty attrs.
    pub fn attr_at(&self, index: usize) -> (Attrs, Option<String>) {
        let entry = self.lock().entries.get(index).cloned();
        match entry {
            Some(Entry::File { size, .. }) => (
                Attrs {
                    size: size.unwrap_or(0),
                    count: 1,
                    count_unknown_size: u64::from(size.is_none()),
                    entries_have_errors: false,
                    is_dir: false,
                    readable: true,
                },
                None,
            ),
            Some(Entry::Dir { dir, .. }) => (dir.attr(), dir.error()),
            None => (Attrs::default(), None),
        }
    }

    /// Resolve the child at `index` to its directory node, `None` for leaves.
    pub fn dir_at(&self, index: usize) -> Option<Arc<Dir>> {
        match self.lock().entries.get(index) {
            Some(Entry::Dir { dir, .. }) => Some(Arc::clone(dir)),
            _ => None,
        }
    }

    /// Fill this directory from a backend listing. Returns the child
    /// directories so the walker can queue them.
    pub(crate) fn populate(self: &Arc<Self>, listing: Vec<BackendEntry>) -> Vec<Arc<Dir>> {
        let parent_path = self.path();
        let mut entries = Vec::with_capacity(listing.len());
        let mut child_dirs = Vec::new();
        let (mut size, mut count, mut unknown) = (0u64, 0u64, 0u64);

        for item in listing {
            let path = join_path(&parent_path, &item.name);
            match item.kind {
                EntryKind::File { size: file_size } => {
                    size += file_size.unwrap_or(0);
                    count += 1;
                    unknown += u64::from(file_size.is_none());
                    entries.push(Entry::File {
                        name: item.name,
                        path,
                        size: file_size,
                    });
                }
                EntryKind::Directory => {
                    let dir = Dir::new_child(self, path);
                    child_dirs.push(Arc::clone(&dir));
                    entries.push(Entry::Dir {
                        name: item.name,
                        dir,
                    });
                }
            }
        }

        {
            let mut inner = self.lock();
            inner.entries = entries;
            inner.readable = true;
            inner.size += size;
            inner.count += count;
            inner.count_unknown_size += unknown;
        }
        self.add_to_ancestors(size, count, unknown);
        child_dirs
    }

    /// Record a failed listing. The error text surfaces on this node and
    /// every ancestor gets the descendant-error flag.
    pub(crate) fn mark_unreadable(&self, message: String) {
        self.lock().error = Some(message);
        let mut next = self.parent();
        while let Some(dir) = next {
            let mut inner = dir.lock();
            inner.entries_have_errors = true;
            next = inner.parent.upgrade();
        }
    }

    /// Remove the child at `index` after a successful deletion, subtracting
    /// its aggregates from this node and every ancestor.
    pub fn remove_child_at(&self, index: usize) {
        let removed = {
            let mut inner = self.lock();
            if index >= inner.entries.len() {
                return;
            }
            inner.entries.remove(index)
        };
        let (size, count, unknown) = match &removed {
            Entry::File { size, .. } => (size.unwrap_or(0), 1, u64::from(size.is_none())),
            Entry::Dir { dir, .. } => {
                let attrs = dir.attr();
                (attrs.size, attrs.count, attrs.count_unknown_size)
            }
        };
        {
            let mut inner = self.lock();
            inner.size = inner.size.saturating_sub(size);
            inner.count = inner.count.saturating_sub(count);
            inner.count_unknown_size = inner.count_unknown_size.saturating_sub(unknown);
        }
        self.sub_from_ancestors(size, count, unknown);
    }

    fn add_to_ancestors(&self, size: u64, count: u64, unknown: u64) {
        let mut next = self.parent();
        while let Some(dir) = next {
            let mut inner = dir.lock();
            inner.size += size;
            inner.count += count;
            inner.count_unknown_size += unknown;
            next = inner.parent.upgrade();
        }
    }

    fn sub_from_ancestors(&self, size: u64, count: u64, unknown: u64) {
        let mut next = self.parent();
        while let Some(dir) = next {
            let mut inner = dir.lock();
            inner.size = inner.size.saturating_sub(size);
            inner.count = inner.count.saturating_sub(count);
            inner.count_unknown_size = inner.count_unknown_size.saturating_sub(unknown);
            next = inner.parent.upgrade();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remdu_core::BackendEntry;

    #[test]
    fn test_populate_aggregates_files() {
        let root = Dir::new_root();
        root.populate(vec![
            BackendEntry::file("a", Some(10)),
            BackendEntry::file("b", None),
            BackendEntry::directory("sub"),
        ]);

        let attrs = root.attr();
        assert_eq!(attrs.size, 10);
        assert_eq!(attrs.count, 2);
        assert_eq!(attrs.count_unknown_size, 1);
        assert!(attrs.readable);
        assert_eq!(root.len(), 3);
    }

    #[test]
    fn test_child_listing_propagates_to_ancestors() {
        let root = Dir::new_root();
        let subs = root.populate(vec![BackendEntry::directory("sub")]);
        subs[0].populate(vec![BackendEntry::file("big", Some(100))]);

        assert_eq!(root.attr().size, 100);
        assert_eq!(root.attr().count, 1);

        let (child_attrs, err) = root.attr_at(0);
        assert!(child_attrs.is_dir);
        assert_eq!(child_attrs.size, 100);
        assert!(err.is_none());
    }

    #[test]
    fn test_mark_unreadable_flags_ancestors() {
        let root = Dir::new_root();
        let subs = root.populate(vec![BackendEntry::directory("sub")]);
        subs[0].mark_unreadable("permission denied".to_string());

        assert!(root.attr().entries_have_errors);
        let (attrs, err) = root.attr_at(0);
        assert!(!attrs.readable);
        assert_eq!(err.as_deref(), Some("permission denied"));
    }

    #[test]
    fn test_remove_child_subtracts_from_ancestors() {
        let root = Dir::new_root();
        let subs = root.populate(vec![
            BackendEntry::directory("sub"),
            BackendEntry::file("keep", Some(7)),
        ]);
        subs[0].populate(vec![BackendEntry::file("gone", Some(100))]);
        assert_eq!(root.attr().size, 107);

        root.remove_child_at(0);
        assert_eq!(root.attr().size, 7);
        assert_eq!(root.attr().count, 1);
        assert_eq!(root.len(), 1);
        assert_eq!(root.entries()[0].name(), "keep");
    }

    #[test]
    fn test_entry_identity_paths() {
        let root = Dir::new_root();
        let subs = root.populate(vec![BackendEntry::directory("docs")]);
        subs[0].populate(vec![BackendEntry::file("a.txt", Some(1))]);

        let docs = root.entries();
        assert_eq!(docs[0].path(), "docs");
        let inner = subs[0].entries();
        assert_eq!(inner[0].path(), "docs/a.txt");
        assert_eq!(inner[0].name(), "a.txt");
    }
}
