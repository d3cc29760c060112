/// Scanner module — orchestrates one directory-size scan.
///
/// A scan is a classic fan-out/fan-in pipeline:
/// - **Walk:** one depth-first pass on the calling thread discovers the tree
///   and pushes a [`FileTask`] per file onto a bounded queue.
/// - **Aggregate:** a fixed pool of workers drains the queue, crediting each
///   file's size to every ancestor directory in the shared
///   [`DirectoryAggregate`].
/// - **Reduce:** after every worker has been joined, the aggregate is
///   projected onto the root's direct children and ranked by size.
///
/// [`Scanner`] wraps the pipeline with input validation, timing, and the
/// history side effect.
pub mod reducer;
pub mod walker;
pub mod workers;

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::history::{HistoryLog, HistoryRecord};
use crate::model::{format_size, DirectoryAggregate, ScanResult};
use reducer::Listing;
use walker::WalkStats;

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

/// One unit of aggregation work: a discovered file and its apparent size.
///
/// Produced once by the walker and consumed by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub path: PathBuf,
    pub size: u64,
}

/// Raw per-path totals for a whole tree, before reduction.
#[derive(Debug, Default)]
pub struct TreeSizes {
    /// Canonical scan root that every key lives under.
    pub root: PathBuf,
    /// Aggregate size of every directory, including the root and empty ones.
    pub dirs: HashMap<PathBuf, u64>,
    /// Size of every file discovered.
    pub files: HashMap<PathBuf, u64>,
    pub stats: WalkStats,
}

impl TreeSizes {
    /// Rank the direct children of the root.
    pub fn listing(&self) -> Listing {
        reducer::reduce(&self.root, &self.dirs, &self.files)
    }
}

/// Check that `path` names an existing directory and return its canonical
/// form. No traversal state is created.
pub fn validate_target(path: &str) -> Result<PathBuf, ScanError> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(ScanError::EmptyPath);
    }
    let requested = PathBuf::from(trimmed);

    let metadata = match std::fs::metadata(&requested) {
        Ok(m) => m,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ScanError::NotFound { path: requested });
        }
        Err(err) => {
            return Err(ScanError::Traversal {
                path: requested,
                message: format!("{err}"),
            });
        }
    };
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory { path: requested });
    }

    std::fs::canonicalize(&requested).map_err(|err| ScanError::Traversal {
        path: requested,
        message: format!("{err}"),
    })
}

/// Walk `root` and aggregate every file size into its ancestor directories
/// using `config.workers` threads.
///
/// `root` must already have been validated. The returned totals are
/// identical for any pool size.
pub fn aggregate_tree(root: &Path, config: &ScanConfig) -> Result<TreeSizes, ScanError> {
    let config = config.normalized();
    let aggregate = DirectoryAggregate::new();

    let walked = thread::scope(|scope| -> Result<walker::WalkOutcome, ScanError> {
        let (tx, rx) = crossbeam_channel::bounded::<FileTask>(config.queue_capacity);
        let handles = workers::spawn_workers(scope, config.workers, &rx, &aggregate, root)?;
        drop(rx);

        // `walk` owns the only sender; the queue closes when it returns.
        let walked = walker::walk(root, &aggregate, tx);
        let processed = workers::join_workers(handles)?;
        let walked = walked?;

        debug!(
            "Aggregation complete: {processed} tasks across {} workers",
            config.workers
        );
        debug_assert_eq!(processed, walked.stats.files);
        Ok(walked)
    })?;

    Ok(TreeSizes {
        root: root.to_path_buf(),
        dirs: aggregate.into_inner(),
        files: walked.file_sizes,
        stats: walked.stats,
    })
}

/// Runs scans and records each success in a shared [`HistoryLog`].
pub struct Scanner {
    config: ScanConfig,
    history: Arc<HistoryLog>,
}

impl Scanner {
    /// Create a scanner with its own, initially empty, history log.
    pub fn new(config: ScanConfig) -> Self {
        let config = config.normalized();
        let history = Arc::new(HistoryLog::with_capacity(config.history_capacity));
        Self { config, history }
    }

    /// Create a scanner that appends to an existing history log, e.g. one
    /// shared between several request handlers.
    pub fn with_history(config: ScanConfig, history: Arc<HistoryLog>) -> Self {
        Self {
            config: config.normalized(),
            history,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn history(&self) -> &Arc<HistoryLog> {
        &self.history
    }

    /// Scan `path` and return its direct children ranked by size.
    ///
    /// Validation failures are reported before any traversal starts. There is
    /// no retry and no cancellation: the scan either completes or fails as a
    /// whole.
    pub fn scan(&self, path: &str) -> Result<ScanResult, ScanError> {
        let start = Instant::now();
        let requested = path.trim();
        let root = validate_target(requested)?;

        info!(
            "Starting scan of {} with {} workers",
            root.display(),
            self.config.workers
        );

        let tree = aggregate_tree(&root, &self.config)?;
        let listing = tree.listing();

        let result = ScanResult {
            total_size_formatted: format_size(listing.total_size),
            items: listing.items,
            total_size: listing.total_size,
            scan_time: start.elapsed().as_secs_f64(),
            path: requested.to_string(),
        };

        info!(
            "Scan of {} complete: {} items, {} ({} files, {} dirs, {} skipped) in {:.3}s",
            root.display(),
            result.items.len(),
            result.total_size_formatted,
            tree.stats.files,
            tree.stats.dirs,
            tree.stats.skipped,
            result.scan_time
        );

        self.history.record(HistoryRecord::from_result(&result));
        Ok(result)
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}
