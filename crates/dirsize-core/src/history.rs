/// Scan history — a bounded, most-recent-wins log of completed scans.
///
/// The log is an explicit handle (usually shared as `Arc<HistoryLog>`)
/// rather than process-global state. Every read and write goes through a
/// single `parking_lot::RwLock`, so listing and lookups run concurrently
/// with each other and only appends are exclusive.
use crate::model::{Item, ScanResult};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of scans retained by default.
///
/// Once exceeded, the oldest record is evicted on every append.
pub const HISTORY_CAPACITY: usize = 50;

/// One completed scan as remembered by the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// The path as the caller requested it.
    pub path: String,
    /// When the scan finished.
    pub scan_time: DateTime<Utc>,
    pub total_size: u64,
    /// `total_size` formatted for display.
    pub size_format: String,
    pub items: Vec<Item>,
}

impl HistoryRecord {
    /// Snapshot `result`, stamped with the current time.
    pub fn from_result(result: &ScanResult) -> Self {
        Self::from_result_at(result, Utc::now())
    }

    pub fn from_result_at(result: &ScanResult, at: DateTime<Utc>) -> Self {
        Self {
            path: result.path.clone(),
            scan_time: at,
            total_size: result.total_size,
            size_format: result.total_size_formatted.clone(),
            items: result.items.clone(),
        }
    }

    /// Replay this record as a scan result. History keeps no duration, so
    /// `scan_time` is zero.
    pub fn to_scan_result(&self) -> ScanResult {
        ScanResult {
            items: self.items.clone(),
            total_size: self.total_size,
            total_size_formatted: self.size_format.clone(),
            scan_time: 0.0,
            path: self.path.clone(),
        }
    }
}

/// Append-only, capacity-bounded log of [`HistoryRecord`]s.
#[derive(Debug)]
pub struct HistoryLog {
    capacity: usize,
    /// Oldest at the front, newest at the back.
    records: RwLock<VecDeque<HistoryRecord>>,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty log retaining at most `capacity` records (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: RwLock::new(VecDeque::with_capacity(capacity + 1)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append `record`, evicting the oldest entries beyond capacity.
    pub fn record(&self, record: HistoryRecord) {
        let mut records = self.records.write();
        records.push_back(record);
        while records.len() > self.capacity {
            records.pop_front();
        }
    }

    /// All records, most recent first.
    pub fn list(&self) -> Vec<HistoryRecord> {
        self.records.read().iter().rev().cloned().collect()
    }

    /// The most recent record whose path equals `path` exactly.
    pub fn find(&self, path: &str) -> Option<HistoryRecord> {
        self.records
            .read()
            .iter()
            .rev()
            .find(|record| record.path == path)
            .cloned()
    }

    /// [`find`](Self::find) re-expressed as a [`ScanResult`].
    pub fn lookup(&self, path: &str) -> Option<ScanResult> {
        self.find(path).map(|record| record.to_scan_result())
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::format_size;
    use chrono::TimeZone;
    use compact_str::CompactString;

    fn result_for(path: &str, total: u64) -> ScanResult {
        ScanResult {
            items: vec![Item::new(CompactString::new("child"), total, true)],
            total_size: total,
            total_size_formatted: format_size(total),
            scan_time: 1.25,
            path: path.to_string(),
        }
    }

    #[test]
    fn test_list_is_most_recent_first() {
        let log = HistoryLog::new();
        log.record(HistoryRecord::from_result(&result_for("/a", 1)));
        log.record(HistoryRecord::from_result(&result_for("/b", 2)));
        log.record(HistoryRecord::from_result(&result_for("/c", 3)));

        let paths: Vec<String> = log.list().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/c", "/b", "/a"]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let log = HistoryLog::new();
        for i in 0..=HISTORY_CAPACITY {
            log.record(HistoryRecord::from_result(&result_for(&format!("/p{i}"), i as u64)));
        }
        assert_eq!(log.len(), HISTORY_CAPACITY);
        assert!(log.find("/p0").is_none());
        assert!(log.find("/p1").is_some());
        assert!(log.find(&format!("/p{HISTORY_CAPACITY}")).is_some());
    }

    #[test]
    fn test_find_returns_most_recent_match() {
        let log = HistoryLog::new();
        log.record(HistoryRecord::from_result(&result_for("/data", 10)));
        log.record(HistoryRecord::from_result(&result_for("/other", 5)));
        log.record(HistoryRecord::from_result(&result_for("/data", 20)));

        assert_eq!(log.find("/data").unwrap().total_size, 20);
        assert!(log.find("/dat").is_none());
    }

    #[test]
    fn test_lookup_replays_without_duration() {
        let log = HistoryLog::new();
        log.record(HistoryRecord::from_result(&result_for("/data", 1536)));

        let replay = log.lookup("/data").unwrap();
        assert_eq!(replay.scan_time, 0.0);
        assert_eq!(replay.total_size, 1536);
        assert_eq!(replay.total_size_formatted, "1.5 KB");
        assert_eq!(replay.items.len(), 1);
    }

    #[test]
    fn test_clear_and_minimum_capacity() {
        let log = HistoryLog::with_capacity(0);
        assert_eq!(log.capacity(), 1);
        log.record(HistoryRecord::from_result(&result_for("/a", 1)));
        log.record(HistoryRecord::from_result(&result_for("/b", 1)));
        assert_eq!(log.len(), 1);
        assert_eq!(log.list()[0].path, "/b");

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_record_wire_shape() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = HistoryRecord::from_result_at(&result_for("/data", 10), at);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["path"], "/data");
        assert_eq!(value["scanTime"], "2024-05-01T12:00:00Z");
        assert_eq!(value["totalSize"], 10);
        assert_eq!(value["sizeFormat"], "10 B");
        assert_eq!(value["items"][0]["path"], "child");
    }
}
