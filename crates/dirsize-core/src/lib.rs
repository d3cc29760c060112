//! dirsize core — concurrent directory-size aggregation.
//!
//! This crate contains all scanning logic with no CLI or UI dependencies.
//! It is designed to be reusable behind different frontends (CLI, HTTP, GUI).
//!
//! # Modules
//!
//! - [`scanner`] — Walk → aggregate → reduce pipeline and the [`Scanner`] coordinator.
//! - [`model`] — Shared aggregate map, output types, and size formatting.
//! - [`history`] — Bounded log of completed scans.
//! - [`config`] — Worker-pool and queue tuning.
//! - [`export`] — Table, JSON, and CSV rendering.
//! - [`error`] — Top-level scan failures.

pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod model;
pub mod scanner;

pub use config::ScanConfig;
pub use error::ScanError;
pub use history::{HistoryLog, HistoryRecord};
pub use model::{format_size, Item, ScanResult};
pub use scanner::Scanner;
