/// Output-facing scan types.
///
/// These are the shapes handed to a presentation layer. Field names
/// serialise in camelCase so a web frontend can consume them directly.
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use super::size::format_size;

/// A direct child (file or directory) of the scanned root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Path relative to the scanned root. For direct children this is
    /// just the entry name.
    pub path: CompactString,
    /// Apparent size in bytes. For directories, the sum of every file
    /// anywhere beneath it.
    pub size: u64,
    /// `size` rendered by [`format_size`].
    pub size_formatted: String,
    pub is_dir: bool,
}

impl Item {
    pub fn new(path: CompactString, size: u64, is_dir: bool) -> Self {
        Self {
            path,
            size,
            size_formatted: format_size(size),
            is_dir,
        }
    }
}

/// Immutable snapshot of one completed scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Direct children of the root, largest first.
    pub items: Vec<Item>,
    /// Sum of the direct-children sizes.
    pub total_size: u64,
    pub total_size_formatted: String,
    /// Wall-clock duration of the scan in seconds. Zero for results
    /// replayed from history.
    pub scan_time: f64,
    /// The path as the caller requested it (trimmed, not canonicalised).
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_formats_its_size() {
        let item = Item::new(CompactString::new("logs"), 1536, true);
        assert_eq!(item.size_formatted, "1.5 KB");
        assert!(item.is_dir);
    }

    #[test]
    fn test_scan_result_wire_shape() {
        let result = ScanResult {
            items: vec![Item::new(CompactString::new("a.bin"), 10, false)],
            total_size: 10,
            total_size_formatted: format_size(10),
            scan_time: 0.5,
            path: "/data".to_string(),
        };
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["totalSize"], 10);
        assert_eq!(value["totalSizeFormatted"], "10 B");
        assert_eq!(value["scanTime"], 0.5);
        assert_eq!(value["path"], "/data");
        let item = &value["items"][0];
        assert_eq!(item["path"], "a.bin");
        assert_eq!(item["size"], 10);
        assert_eq!(item["sizeFormatted"], "10 B");
        assert_eq!(item["isDir"], false);
    }
}
