//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.salescope.toml` files.

use crate::cli::OutputFormat;
use crate::dataset::DEFAULT_DELIMITER;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".salescope.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Chart settings.
    #[serde(default)]
    pub charts: ChartsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory receiving the report and its charts.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            verbose: false,
        }
    }
}

fn default_output_dir() -> String {
    "report".to_string()
}

/// Dataset location and parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path of the sales CSV.
    #[serde(default = "default_data_path")]
    pub path: String,

    /// Field delimiter, a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            delimiter: default_delimiter(),
        }
    }
}

impl DataConfig {
    /// The delimiter as a byte, or `None` when it is not exactly one ASCII char.
    pub fn parse_delimiter(&self) -> Option<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Some(*b),
            _ => None,
        }
    }

    /// The delimiter as a byte, or a comma when unparsable. `Config::load`
    /// rejects unparsable delimiters.
    pub fn delimiter_byte(&self) -> u8 {
        self.parse_delimiter().unwrap_or(DEFAULT_DELIMITER)
    }
}

fn default_data_path() -> String {
    "blinkit_data.csv".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Document title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Maximum rows in the data overview table.
    #[serde(default)]
    pub table_rows: Option<usize>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            format: OutputFormat::default(),
            table_rows: None,
        }
    }
}

fn default_title() -> String {
    "Blinkit Data Analysis".to_string()
}

/// Chart rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// Resolution used to turn figure inches into pixels.
    #[serde(default = "default_pixels_per_inch")]
    pub pixels_per_inch: u32,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            pixels_per_inch: default_pixels_per_inch(),
        }
    }
}

fn default_pixels_per_inch() -> u32 {
    100
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if config.charts.pixels_per_inch == 0 {
            anyhow::bail!("pixels_per_inch must be at least 1 in {}", path.display());
        }
        if config.data.parse_delimiter().is_none() {
            anyhow::bail!(
                "delimiter must be a single ASCII character, got {:?} in {}",
                config.data.delimiter,
                path.display()
            );
        }

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dataset) = args.dataset {
            self.data.path = dataset.display().to_string();
        }
        if let Some(delimiter) = args.delimiter {
            self.data.delimiter = delimiter.to_string();
        }

        if let Some(ref output) = args.output {
            self.general.output_dir = output.display().to_string();
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(rows) = args.table_rows {
            self.report.table_rows = Some(rows);
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
