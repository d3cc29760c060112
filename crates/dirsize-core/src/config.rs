/// Scan tuning knobs.
///
/// Every field has a default, so a frontend can embed `ScanConfig` in its
/// own settings file and only override what it cares about.
use serde::{Deserialize, Serialize};

use crate::history::HISTORY_CAPACITY;

/// Number of aggregation workers used when nothing else is configured.
///
/// Deliberately independent of core count: aggregation is lock-bound, not
/// CPU-bound, and results are identical for any pool size.
pub const DEFAULT_WORKERS: usize = 4;

/// Maximum number of file tasks that may queue up between the walker and
/// the worker pool before the walker blocks.
pub const TASK_QUEUE_CAPACITY: usize = 1_024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Size of the aggregation worker pool.
    pub workers: usize,
    /// Capacity of the bounded file-task queue.
    pub queue_capacity: usize,
    /// Number of scans retained by the history log.
    pub history_capacity: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: TASK_QUEUE_CAPACITY,
            history_capacity: HISTORY_CAPACITY,
        }
    }
}

impl ScanConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Copy with every value clamped to at least 1.
    ///
    /// A zero-sized pool would never drain the queue and a zero-capacity
    /// history could never be queried.
    pub fn normalized(&self) -> Self {
        Self {
            workers: self.workers.max(1),
            queue_capacity: self.queue_capacity.max(1),
            history_capacity: self.history_capacity.max(1),
        }
    }
}
