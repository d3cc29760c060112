/// Top-level scan failures.
///
/// Per-entry problems (an unreadable file, a directory that vanished
/// mid-walk) are not errors: the walker skips them and the scan still
/// succeeds. Everything here aborts the scan with no partial result.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("path must not be empty")]
    EmptyPath,

    #[error("directory does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("failed to traverse {}: {message}", path.display())]
    Traversal { path: PathBuf, message: String },

    #[error("aggregation worker pool failed: {message}")]
    WorkerPool { message: String },
}

impl ScanError {
    /// `true` for failures caused by the caller's input rather than the
    /// filesystem walk itself.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ScanError::EmptyPath | ScanError::NotFound { .. } | ScanError::NotADirectory { .. }
        )
    }
}
