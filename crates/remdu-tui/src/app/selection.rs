//! Multi-select state for the active directory.

use std::collections::HashMap;

use super::viewport::DirPos;

/// Entries chosen for batch operations, keyed by identity path.
///
/// Each entry keeps the viewport snapshot taken when it was selected; the
/// batch-delete path resolves those through the current permutation at
/// confirm time. Scoped to one directory - changing the active directory
/// clears it.
#[derive(Debug, Default)]
pub struct SelectionSet {
    entries: HashMap<String, DirPos>,
}

impl SelectionSet {
    /// Toggle `key` in or out of the selection.
    pub fn toggle(&mut self, key: &str, pos: DirPos) {
        if self.entries.remove(key).is_none() {
            self.entries.insert(key.to_string(), pos);
        }
    }

    /// Check whether `key` is selected.
    pub fn is_selected(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop a single key (after its entry was deleted).
    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the selected keys and their saved positions.
    pub fn snapshot(&self) -> Vec<(String, DirPos)> {
        self.entries
            .iter()
            .map(|(key, pos)| (key.clone(), *pos))
            .collect()
    }
}
