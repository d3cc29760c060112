/// Reduction of the full aggregate map down to the root's direct children.
use crate::model::Item;
use compact_str::CompactString;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The ranked, one-level listing of a scanned root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Direct children, largest first; equal sizes ordered by path.
    pub items: Vec<Item>,
    /// Sum of the direct-children sizes.
    pub total_size: u64,
}

/// Project `dir_sizes` and `file_sizes` onto the direct children of `root`.
///
/// Must only be called once every aggregation worker has been joined.
/// Deeper entries are ignored (their sizes are already folded into the
/// direct-child directory that contains them), and the root's own entry
/// is never listed.
pub fn reduce(
    root: &Path,
    dir_sizes: &HashMap<PathBuf, u64>,
    file_sizes: &HashMap<PathBuf, u64>,
) -> Listing {
    let dirs = dir_sizes.iter().map(|(path, &size)| (path, size, true));
    let files = file_sizes.iter().map(|(path, &size)| (path, size, false));

    let mut items: Vec<Item> = dirs
        .chain(files)
        .filter(|(path, _, _)| path.as_path() != root && path.parent() == Some(root))
        .map(|(path, size, is_dir)| Item::new(relative_name(root, path), size, is_dir))
        .collect();

    items.sort_unstable_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));

    let total_size = items.iter().map(|item| item.size).sum();
    Listing { items, total_size }
}

fn relative_name(root: &Path, path: &Path) -> CompactString {
    let rel = path.strip_prefix(root).unwrap_or(path);
    CompactString::new(rel.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, u64)]) -> HashMap<PathBuf, u64> {
        entries
            .iter()
            .map(|(p, s)| (PathBuf::from(p), *s))
            .collect()
    }

    #[test]
    fn test_only_direct_children_are_listed() {
        let root = Path::new("/scan");
        let dirs = map(&[
            ("/scan", 600),
            ("/scan/a", 500),
            ("/scan/a/deep", 400),
            ("/scan/empty", 0),
        ]);
        let files = map(&[("/scan/top.bin", 100), ("/scan/a/deep/x.bin", 400)]);

        let listing = reduce(root, &dirs, &files);

        let names: Vec<&str> = listing.items.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(names, vec!["a", "top.bin", "empty"]);
        assert_eq!(listing.total_size, 600);
        assert!(listing.items[0].is_dir);
        assert!(!listing.items[1].is_dir);
    }

    #[test]
    fn test_total_uses_children_not_root_entry() {
        let root = Path::new("/scan");
        // A stale root total must not leak into the listing total.
        let dirs = map(&[("/scan", 9_999), ("/scan/a", 10)]);
        let listing = reduce(root, &dirs, &HashMap::new());
        assert_eq!(listing.total_size, 10);
        assert_eq!(listing.items.len(), 1);
    }

    #[test]
    fn test_ties_are_ordered_by_path() {
        let root = Path::new("/scan");
        let files = map(&[("/scan/c", 5), ("/scan/a", 5), ("/scan/b", 5), ("/scan/z", 9)]);
        let listing = reduce(root, &HashMap::new(), &files);
        let names: Vec<&str> = listing.items.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "b", "c"]);
    }

    #[test]
    fn test_empty_root_yields_empty_listing() {
        let root = Path::new("/scan");
        let listing = reduce(root, &map(&[("/scan", 0)]), &HashMap::new());
        assert!(listing.items.is_empty());
        assert_eq!(listing.total_size, 0);
    }

    #[test]
    fn test_items_carry_formatted_sizes() {
        let root = Path::new("/scan");
        let files = map(&[("/scan/big.iso", 1_073_741_824)]);
        let listing = reduce(root, &HashMap::new(), &files);
        assert_eq!(listing.items[0].size_formatted, "1.0 GB");
    }
}
