/// Rendering of scan results and history for terminals and files.
///
/// - [`write_table`] — the classic aligned listing (size, path, kind).
/// - [`write_json`] — any serialisable value, pretty-printed.
/// - [`write_csv`] — one row per item across any number of scans.
use crate::history::HistoryRecord;
use crate::model::{format_count, ScanResult};
use serde::Serialize;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error while writing output: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Write `result` as an aligned table followed by a total line.
///
/// ```text
///     1.5 MB logs (dir)
///    12.0 KB notes.txt (file)
///     1.5 MB total (2 items)
/// ```
pub fn write_table<W: Write>(out: &mut W, result: &ScanResult) -> Result<(), ExportError> {
    for item in &result.items {
        let suffix = if item.is_dir { " (dir)" } else { " (file)" };
        writeln!(out, "{:>10} {}{}", item.size_formatted, item.path, suffix)?;
    }
    let noun = if result.items.len() == 1 { "item" } else { "items" };
    writeln!(
        out,
        "{:>10} total ({} {noun})",
        result.total_size_formatted,
        format_count(result.items.len() as u64)
    )?;
    Ok(())
}

/// Write the history log as a table, one line per record.
pub fn write_history_table<W: Write>(
    out: &mut W,
    records: &[HistoryRecord],
) -> Result<(), ExportError> {
    for record in records {
        writeln!(
            out,
            "{}  {:>10}  {}",
            record.scan_time.format("%Y-%m-%d %H:%M:%S"),
            record.size_format,
            record.path
        )?;
    }
    Ok(())
}

/// Write any serialisable value as pretty JSON with a trailing newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    out: &mut W,
    value: &T,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Everything one CLI invocation produced, as a single JSON document.
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    pub scans: &'a [ScanResult],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<&'a [HistoryRecord]>,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    root: &'a str,
    path: &'a str,
    size: u64,
    size_formatted: &'a str,
    is_dir: bool,
}

/// Write the items of every result in `results` as CSV under one header.
///
/// The `root` column carries each result's requested path so rows from
/// several scans stay distinguishable.
pub fn write_csv<W: Write>(out: W, results: &[ScanResult]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(out);
    for result in results {
        for item in &result.items {
            wtr.serialize(CsvRow {
                root: &result.path,
                path: item.path.as_str(),
                size: item.size,
                size_formatted: &item.size_formatted,
                is_dir: item.is_dir,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}
