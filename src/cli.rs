//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Salescope - exploratory sales report for Blinkit grocery data
///
/// Loads the sales CSV, normalizes fat-content labels, computes KPIs and
/// writes a Markdown (or JSON) report with SVG charts.
///
/// Examples:
///   salescope blinkit_data.csv
///   salescope data/sales.csv --output build/report --table-rows 20
///   salescope data/sales.csv --format json
///   salescope --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Sales CSV to analyze
    ///
    /// Defaults to the `[data] path` of the config file, or blinkit_data.csv.
    #[arg(value_name = "DATASET", env = "SALESCOPE_DATASET")]
    pub dataset: Option<PathBuf>,

    /// Directory for the report and its charts
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .salescope.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Field delimiter of the dataset
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Maximum rows shown in the data overview table
    #[arg(long, value_name = "N")]
    pub table_rows: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .salescope.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File name of the report document.
    pub fn file_name(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "report.md",
            OutputFormat::Json => "report.json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.table_rows == Some(0) {
            return Err("Table rows must be at least 1".to_string());
        }

        if let Some(delimiter) = self.delimiter {
            if !delimiter.is_ascii() {
                return Err(format!(
                    "Delimiter must be a single ASCII character, got '{}'",
                    delimiter
                ));
            }
        }

        if let Some(ref dataset) = self.dataset {
            if dataset.is_dir() {
                return Err(format!("Dataset path is a directory: {}", dataset.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
