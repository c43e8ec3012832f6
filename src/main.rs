//! Salescope - exploratory sales report generator
//!
//! A CLI tool that loads Blinkit grocery sales data, normalizes it and
//! writes a Markdown or JSON report with KPIs, insight sections and SVG charts.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any failure (unreadable dataset, bad config, write error, etc.)

mod analysis;
mod chart;
mod cli;
mod config;
mod dataset;
mod error;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use report::ReportOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging so `[general] verbose` can raise the level
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(log_level(&args, &config));

    info!("Salescope v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_report(&args, &config) {
        error!("Report failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .salescope.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to change the dataset path, output directory and chart size.");
    Ok(())
}

/// Pick the log level from the flags, letting the config file turn on verbose output.
fn log_level(args: &Args, config: &Config) -> tracing::Level {
    if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    }
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Build the report and write it with its charts.
fn run_report(args: &Args, config: &Config) -> Result<()> {
    let dataset_path = PathBuf::from(&config.data.path);
    let output_dir = PathBuf::from(&config.general.output_dir);
    let options = ReportOptions::from(config);

    println!("📥 Loading dataset: {}", dataset_path.display());
    let report = report::generate_report(&dataset_path, &options)
        .with_context(|| format!("Failed to analyze {}", dataset_path.display()))?;

    println!("\n📝 Writing report...");
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let charts = report::write_charts(&report, &output_dir, !args.quiet)?;

    let format = config.report.format;
    let output = match format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    let report_path = output_dir.join(format.file_name());
    std::fs::write(&report_path, &output)
        .with_context(|| format!("Failed to write report to {}", report_path.display()))?;

    // Print summary
    println!("\n📊 Report Summary:");
    println!("   Rows analyzed: {}", report.metadata.row_count);
    for kpi in &report.kpis {
        println!("   {}", kpi.formatted());
    }
    println!("   Insight sections: {}", report.sections.len());
    println!("   Charts written: {}", charts.len());
    println!("   Duration: {:.1}s", report.metadata.duration_seconds);
    println!("\n✅ Report saved to: {}", report_path.display());

    Ok(())
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = if let Some(ref config_path) = args.config {
        Config::load(config_path)?
    } else {
        Config::load_default()?.unwrap_or_default()
    };

    config.merge_with_args(args);
    Ok(config)
}
