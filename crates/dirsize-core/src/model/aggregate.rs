/// Per-directory running totals shared between the walker and the
/// aggregation workers.
///
/// A single `parking_lot::Mutex` guards the whole map. Both operations the
/// scan performs — registering a newly discovered directory and crediting a
/// file's size up its ancestor chain — are read-modify-write under that one
/// lock, so no addition can be lost regardless of how workers interleave.
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Cumulative byte size per absolute directory path.
#[derive(Debug, Default)]
pub struct DirectoryAggregate {
    sizes: Mutex<HashMap<PathBuf, u64>>,
}

impl DirectoryAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `dir` with a zero total unless it is already present.
    ///
    /// Returns `true` if the directory was newly inserted.
    pub fn register_dir(&self, dir: &Path) -> bool {
        let mut sizes = self.sizes.lock();
        if sizes.contains_key(dir) {
            return false;
        }
        sizes.insert(dir.to_path_buf(), 0);
        true
    }

    /// Add `size` to every directory from `file`'s parent up to and
    /// including `root`.
    ///
    /// The lock is held for the entire upward walk. Ascent also stops at the
    /// filesystem root, so a file outside `root` can never loop forever.
    /// Returns the number of directories credited.
    pub fn credit_ancestors(&self, file: &Path, size: u64, root: &Path) -> usize {
        let mut credited = 0;
        let mut sizes = self.sizes.lock();
        let mut current = file.parent();
        while let Some(dir) = current {
            match sizes.get_mut(dir) {
                Some(total) => *total += size,
                None => {
                    sizes.insert(dir.to_path_buf(), size);
                }
            }
            credited += 1;
            if dir == root {
                break;
            }
            current = dir.parent();
        }
        credited
    }

    /// Current total for `dir`, if it has been registered.
    pub fn get(&self, dir: &Path) -> Option<u64> {
        self.sizes.lock().get(dir).copied()
    }

    pub fn len(&self) -> usize {
        self.sizes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.lock().is_empty()
    }

    /// Consume the aggregate and return the final map.
    ///
    /// Taking `self` by value means no writer can still hold a reference,
    /// which is the barrier the reducer relies on.
    pub fn into_inner(self) -> HashMap<PathBuf, u64> {
        self.sizes.into_inner()
    }
}
