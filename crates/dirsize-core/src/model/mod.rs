/// Data model for dirsize scans.
///
/// Re-exports the shared aggregate map, the output types, and the
/// size formatter.
pub mod aggregate;
pub mod item;
pub mod size;

pub use aggregate::DirectoryAggregate;
pub use item::{Item, ScanResult};
pub use size::{format_count, format_size};
