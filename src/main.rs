//! DataSleuth — research-dataset metadata scanner.
//!
//! Thin binary entry point. All logic lives in the `datasleuth-core`
//! and `datasleuth-report` crates.

use anyhow::Context;
use clap::Parser;
use datasleuth_core::config::{DatasetConfig, DEFAULT_ORGANIZATION};
use datasleuth_core::scanner::scan_dataset;
use std::path::PathBuf;

/// Scan a research-data directory and emit JSON and HTML metadata reports.
#[derive(Debug, Parser)]
#[command(name = "datasleuth", about = "Research dataset metadata scanner", long_about = None)]
struct Args {
    /// Dataset directory to scan.
    dataset: PathBuf,

    /// Configuration file (defaults to config.json inside the dataset).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat tab-delimited summary tables as counts matrices
    /// (samples in the header row).
    #[arg(long)]
    counts_tsv: bool,

    /// Organization recorded on every file record.
    #[arg(long, default_value = DEFAULT_ORGANIZATION)]
    organization: String,

    /// JSON output file name, written inside the dataset directory.
    #[arg(long, default_value = "output.json")]
    output_json: String,

    /// HTML output file name, written inside the dataset directory.
    #[arg(long, default_value = "output.html")]
    output_html: String,

    /// Log per-file classification decisions.
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let dataset = args
        .dataset
        .canonicalize()
        .with_context(|| format!("dataset directory {} not found", args.dataset.display()))?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| DatasetConfig::find_in(&dataset));
    let mut config =
        DatasetConfig::load(&config_path).with_context(|| "invalid dataset configuration")?;
    if args.counts_tsv {
        config.counts_format = true;
    }
    config.organization = args.organization.clone();

    tracing::info!(dataset = %dataset.display(), "scanning");
    let result = scan_dataset(&dataset, &config)?;
    tracing::info!(
        files = result.file_count(),
        total_kb = result.total_size_kb,
        "scan complete"
    );

    let json_path = dataset.join(&args.output_json);
    let html_path = dataset.join(&args.output_html);
    datasleuth_report::json::write_json(&json_path, &result, &dataset)?;
    datasleuth_report::html::write_html(&html_path, &result, &dataset.to_string_lossy())?;
    tracing::info!(
        json = %json_path.display(),
        html = %html_path.display(),
        "reports written"
    );

    Ok(())
}
