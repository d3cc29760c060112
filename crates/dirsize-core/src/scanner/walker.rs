/// Single-threaded depth-first directory walker — the producer half of a scan.
///
/// Uses `jwalk` in serial mode so discovery order is deterministic and the
/// walk runs entirely on the calling thread. Every directory is registered
/// in the shared [`DirectoryAggregate`] as soon as it is seen (so empty
/// directories still get a zero entry), and every file becomes a
/// [`FileTask`] on the bounded queue. The walker never aggregates sizes
/// itself.
use crate::error::ScanError;
use crate::model::DirectoryAggregate;
use crate::scanner::FileTask;
use crossbeam_channel::Sender;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Counters collected during one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Files discovered and queued for aggregation.
    pub files: u64,
    /// Directories discovered, including the root.
    pub dirs: u64,
    /// Entries skipped because they could not be read or stat'ed.
    pub skipped: u64,
}

/// What the walker hands back once the queue has been closed.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Apparent size of every file discovered, keyed by absolute path.
    pub file_sizes: HashMap<PathBuf, u64>,
    pub stats: WalkStats,
}

/// Walk `root`, registering directories in `aggregate` and publishing one
/// task per file on `tasks`.
///
/// `tasks` is taken by value and dropped on return, which closes the queue
/// for the workers. Unreadable entries below the root are skipped; a
/// directory whose listing fails is still registered (with whatever it was
/// credited, usually zero) and counted as skipped. Failing to read the root
/// itself aborts the walk.
pub fn walk(
    root: &Path,
    aggregate: &DirectoryAggregate,
    tasks: Sender<FileTask>,
) -> Result<WalkOutcome, ScanError> {
    let start = Instant::now();
    let mut outcome = WalkOutcome::default();

    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(jwalk::Parallelism::Serial);

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                if err.depth() == 0 || err.path() == Some(root) {
                    return Err(ScanError::Traversal {
                        path: root.to_path_buf(),
                        message: format!("{err}"),
                    });
                }
                debug!("Skipping unreadable entry: {err}");
                outcome.stats.skipped += 1;
                continue;
            }
        };

        let path = entry.path();

        if entry.file_type().is_dir() {
            // jwalk reports a failed listing on the directory's own entry
            // rather than as an `Err` item.
            if let Some(err) = &entry.read_children_error {
                if entry.depth == 0 {
                    return Err(ScanError::Traversal {
                        path: root.to_path_buf(),
                        message: format!("{err}"),
                    });
                }
                debug!("Skipping contents of {}: {err}", path.display());
                outcome.stats.skipped += 1;
            }
            aggregate.register_dir(&path);
            outcome.stats.dirs += 1;
            continue;
        }

        // Symlinks are not followed: a link counts with its own size.
        let size = match std::fs::symlink_metadata(&path) {
            Ok(meta) => meta.len(),
            Err(err) => {
                debug!("Skipping {}: {err}", path.display());
                outcome.stats.skipped += 1;
                continue;
            }
        };

        outcome.file_sizes.insert(path.clone(), size);
        outcome.stats.files += 1;

        if tasks.send(FileTask { path, size }).is_err() {
            return Err(ScanError::WorkerPool {
                message: "task queue closed before the walk finished".to_string(),
            });
        }
    }

    debug!(
        "Walk of {} complete: {} files, {} dirs, {} skipped in {:?}",
        root.display(),
        outcome.stats.files,
        outcome.stats.dirs,
        outcome.stats.skipped,
        start.elapsed()
    );

    Ok(outcome)
}
