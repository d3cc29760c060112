//! dirsize — what is consuming disk space under this directory?
//!
//! Thin binary entry point. All scanning logic lives in `dirsize-core`.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dirsize_core::export::{self, ScanReport};
use dirsize_core::{ScanConfig, ScanError, Scanner};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Aligned size / path listing.
    Table,
    /// Pretty-printed JSON.
    Json,
    /// Comma-separated rows with a header.
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "dirsize")]
#[command(version, about = "Rank the children of a directory by the disk space they consume")]
struct Args {
    /// Directories to scan. Prompts on stdin when omitted.
    paths: Vec<String>,

    /// Output format.
    #[arg(long, short, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Number of aggregation worker threads.
    #[arg(long, default_value_t = dirsize_core::config::DEFAULT_WORKERS)]
    workers: usize,

    /// Capacity of the queue between the walker and the workers.
    #[arg(long, default_value_t = dirsize_core::config::TASK_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Print the scan history (most recent first) after scanning.
    #[arg(long)]
    history: bool,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Exit status for a scan rejected because of its input path.
const EXIT_INVALID_PATH: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let invalid_path = err
                .downcast_ref::<ScanError>()
                .is_some_and(ScanError::is_validation);
            if invalid_path {
                ExitCode::from(EXIT_INVALID_PATH)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = ScanConfig::default()
        .with_workers(args.workers)
        .with_queue_capacity(args.queue_capacity);
    let scanner = Scanner::new(config);
    info!(
        "dirsize starting: {} workers, queue capacity {}",
        scanner.config().workers,
        scanner.config().queue_capacity
    );

    let paths = if args.paths.is_empty() {
        vec![prompt_for_path()?]
    } else {
        args.paths.clone()
    };

    let mut results = Vec::with_capacity(paths.len());
    for path in &paths {
        info!("Scanning {path}");
        let result = scanner
            .scan(path)
            .with_context(|| format!("scan of {path:?} failed"))?;
        results.push(result);
    }
    let history = args.history.then(|| scanner.history().list());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.format {
        Format::Table => {
            for result in &results {
                if results.len() > 1 {
                    writeln!(out, "{}:", result.path)?;
                }
                export::write_table(&mut out, result)?;
            }
            if let Some(records) = &history {
                writeln!(out, "History:")?;
                export::write_history_table(&mut out, records)?;
            }
        }
        Format::Json => match (results.as_slice(), &history) {
            // A lone scan keeps the plain result shape.
            ([single], None) => export::write_json(&mut out, single)?,
            (scans, history) => export::write_json(
                &mut out,
                &ScanReport {
                    scans,
                    history: history.as_deref(),
                },
            )?,
        },
        Format::Csv => {
            export::write_csv(&mut out, &results)?;
            // History does not fit the item columns; keep stdout valid CSV.
            if let Some(records) = &history {
                let mut err = io::stderr().lock();
                writeln!(err, "History:")?;
                export::write_history_table(&mut err, records)?;
            }
        }
    }

    out.flush().context("failed to flush stdout")?;
    Ok(())
}

/// Install the fmt subscriber on stderr so stdout carries only results.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Interactive fallback: read a single directory path from stdin.
fn prompt_for_path() -> Result<String> {
    eprint!("Enter directory path: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read directory path from stdin")?;
    Ok(line.trim().to_string())
}
