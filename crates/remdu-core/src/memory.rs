//! In-memory backend for tests and demos.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::backend::{Backend, BackendEntry};
use crate::error::BackendError;

enum MemNode {
    File { size: Option<u64> },
    Dir(BTreeMap<String, MemNode>),
}

/// Backend over an in-memory tree.
///
/// Deletions mutate the store, so a listing after a delete observes the
/// change. Listing failures can be injected per directory with
/// [`fail_dir`](MemoryBackend::fail_dir).
pub struct MemoryBackend {
    name: String,
    root: Mutex<BTreeMap<String, MemNode>>,
    failing: Mutex<HashSet<String>>,
}

impl MemoryBackend {
    /// Create an empty backend with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: Mutex::new(BTreeMap::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// A small sample tree for the `--demo` flag.
    pub fn demo() -> Self {
        let backend = Self::new("demo:");
        backend.add_file("README.md", Some(4_096));
        backend.add_file("music/album/track01.flac", Some(31_457_280));
        backend.add_file("music/album/track02.flac", Some(29_360_128));
        backend.add_file("photos/2024/beach.jpg", Some(5_242_880));
        backend.add_file("photos/2024/city.jpg", Some(4_718_592));
        backend.add_file("photos/archive.zip", Some(209_715_200));
        backend.add_file("logs/app.log", None);
        backend.add_dir("tmp");
        backend
    }

    /// Add a leaf object, creating intermediate directories.
    pub fn add_file(&self, path: &str, size: Option<u64>) {
        let mut root = self.lock_root();
        let (dir, name) = split_parent(path);
        let map = ensure_dir(&mut root, dir);
        map.insert(name.to_string(), MemNode::File { size });
    }

    /// Add an (empty) directory, creating intermediate directories.
    pub fn add_dir(&self, path: &str) {
        let mut root = self.lock_root();
        ensure_dir(&mut root, path);
    }

    /// Make every listing of `path` fail with a permission error.
    pub fn fail_dir(&self, path: &str) {
        self.lock_failing().insert(path.to_string());
    }

    fn lock_root(&self) -> MutexGuard<'_, BTreeMap<String, MemNode>> {
        self.root.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_failing(&self) -> MutexGuard<'_, HashSet<String>> {
        self.failing.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn split_parent(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", path),
    }
}

fn ensure_dir<'a>(
    root: &'a mut BTreeMap<String, MemNode>,
    path: &str,
) -> &'a mut BTreeMap<String, MemNode> {
    let mut map = root;
    if path.is_empty() {
        return map;
    }
    for segment in path.split('/') {
        let node = map
            .entry(segment.to_string())
            .or_insert_with(|| MemNode::Dir(BTreeMap::new()));
        map = match node {
            MemNode::Dir(children) => children,
            // a file in the way is replaced, tests build consistent trees
            node => {
                *node = MemNode::Dir(BTreeMap::new());
                match node {
                    MemNode::Dir(children) => children,
                    MemNode::File { .. } => unreachable!(),
                }
            }
        };
    }
    map
}

fn dir_at<'a>(
    root: &'a BTreeMap<String, MemNode>,
    path: &str,
) -> Result<&'a BTreeMap<String, MemNode>, BackendError> {
    let mut map = root;
    if path.is_empty() {
        return Ok(map);
    }
    for segment in path.split('/') {
        map = match map.get(segment) {
            Some(MemNode::Dir(children)) => children,
            Some(MemNode::File { .. }) => {
                return Err(BackendError::NotADirectory {
                    path: path.to_string(),
                });
            }
            None => {
                return Err(BackendError::NotFound {
                    path: path.to_string(),
                });
            }
        };
    }
    Ok(map)
}

fn dir_at_mut<'a>(
    root: &'a mut BTreeMap<String, MemNode>,
    path: &str,
) -> Result<&'a mut BTreeMap<String, MemNode>, BackendError> {
    let mut map = root;
    if path.is_empty() {
        return Ok(map);
    }
    for segment in path.split('/') {
        map = match map.get_mut(segment) {
            Some(MemNode::Dir(children)) => children,
            Some(MemNode::File { .. }) => {
                return Err(BackendError::NotADirectory {
                    path: path.to_string(),
                });
            }
            None => {
                return Err(BackendError::NotFound {
                    path: path.to_string(),
                });
            }
        };
    }
    Ok(map)
}

impl Backend for MemoryBackend {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn list(&self, path: &str) -> Result<Vec<BackendEntry>, BackendError> {
        if self.lock_failing().contains(path) {
            return Err(BackendError::PermissionDenied {
                path: path.to_string(),
            });
        }
        let root = self.lock_root();
        let map = dir_at(&root, path)?;
        Ok(map
            .iter()
            .map(|(name, node)| match node {
                MemNode::File { size } => BackendEntry::file(name.as_str(), *size),
                MemNode::Dir(_) => BackendEntry::directory(name.as_str()),
            })
            .collect())
    }

    fn delete_file(&self, path: &str) -> Result<(), BackendError> {
        let mut root = self.lock_root();
        let (dir, name) = split_parent(path);
        let map = dir_at_mut(&mut root, dir)?;
        match map.get(name) {
            Some(MemNode::File { .. }) => {
                map.remove(name);
                Ok(())
            }
            Some(MemNode::Dir(_)) => Err(BackendError::Other {
                message: format!("is a directory: {path}"),
            }),
            None => Err(BackendError::NotFound {
                path: path.to_string(),
            }),
        }
    }

    fn purge(&self, path: &str) -> Result<(), BackendError> {
        let mut root = self.lock_root();
        let (dir, name) = split_parent(path);
        let map = dir_at_mut(&mut root, dir)?;
        match map.get(name) {
            Some(MemNode::Dir(_)) => {
                map.remove(name);
                Ok(())
            }
            Some(MemNode::File { .. }) => Err(BackendError::NotADirectory {
                path: path.to_string(),
            }),
            None => Err(BackendError::NotFound {
                path: path.to_string(),
            }),
        }
    }
}
