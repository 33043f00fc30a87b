//! Merge stored questionnaire responses into one CSV table.
//!
//! Inputs are response files (`.csv`, `.json`, `.jsonl`), directories of
//! such files, or a store directory read through its backend.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use questionnaire_aggregate::{RawResponseTable, aggregate, load_directory, load_file, load_sink};
use questionnaire_store::{StorageBackend, StorageConfig};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Merge questionnaire response tables by question number
///
/// Examples:
///   aggregate responses/pilot.csv responses/full.jsonl -o unified.csv
///   aggregate --store responses --backend csv
///   aggregate responses/ --filter group_assignment=A
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Response files or directories of response files
    #[arg(value_name = "PATH")]
    inputs: Vec<PathBuf>,

    /// Read every table of a store directory
    #[arg(long, value_name = "DIR", env = "QUESTIONNAIRE_STORE")]
    store: Option<PathBuf>,

    /// Format of the store directory
    #[arg(long, default_value = "json", value_name = "FORMAT")]
    backend: StorageBackend,

    /// Keep only rows where COLUMN has VALUE (repeatable)
    #[arg(long, value_name = "COLUMN=VALUE")]
    filter: Vec<String>,

    /// Write the unified table here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    if args.inputs.is_empty() && args.store.is_none() {
        bail!("Nothing to aggregate: pass response files or --store");
    }

    let mut tables: Vec<RawResponseTable> = Vec::new();
    for input in &args.inputs {
        if input.is_dir() {
            tables.extend(
                load_directory(input)
                    .with_context(|| format!("Failed to load {}", input.display()))?,
            );
        } else {
            tables.push(
                load_file(input).with_context(|| format!("Failed to load {}", input.display()))?,
            );
        }
    }
    if let Some(directory) = &args.store {
        let config = StorageConfig {
            backend: args.backend,
            directory: directory.clone(),
        };
        let sink = config.open();
        tables.extend(load_sink(sink.as_ref()).context("Failed to read the store")?);
    }

    let report = aggregate(&tables)?;
    for collision in &report.collisions {
        warn!("{collision}");
    }

    let mut table = report.table;
    for filter in &args.filter {
        let Some((column, value)) = filter.split_once('=') else {
            bail!("Invalid filter '{filter}', expected COLUMN=VALUE");
        };
        if !table.has_column(column) {
            warn!(column, "filter column not present; no rows match");
        }
        table = table.filter_rows(column, &[value]);
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            table.write_csv(BufWriter::new(file))?;
            info!(path = %path.display(), rows = table.len(), "unified table written");
        }
        None => table.write_csv(io::stdout().lock())?,
    }
    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}
