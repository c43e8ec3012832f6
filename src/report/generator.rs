//! Markdown and JSON report output.
//!
//! This module turns a [`ReportDocument`] into text and writes the
//! rendered charts next to it.

use crate::models::{DataTable, Exhibit, InsightSection, Kpi, ReportDocument, ReportMetadata};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory, relative to the report, that holds chart images.
pub const CHARTS_DIR: &str = "charts";

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &ReportDocument) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("# {}\n\n", report.title));

    output.push_str(&generate_table_section(&report.data_table));
    output.push_str(&generate_kpi_section(&report.kpis));

    for section in &report.sections {
        output.push_str(&generate_insight_section(section));
    }

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Report Details\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.dataset_path));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.row_count));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the raw data table.
fn generate_table_section(table: &DataTable) -> String {
    let mut section = String::new();

    section.push_str("## Data Overview\n\n");

    if table.headers.is_empty() {
        section.push_str("*No columns.*\n\n");
        return section;
    }

    section.push_str(&table_row(&table.headers));
    section.push_str(&format!("|{}\n", ":---|".repeat(table.headers.len())));
    for row in &table.rows {
        section.push_str(&table_row(row));
    }

    if table.rows.len() < table.total_rows {
        section.push_str(&format!(
            "\n*Showing {} of {} rows.*\n",
            table.rows.len(),
            table.total_rows
        ));
    }
    section.push('\n');

    section
}

/// Generate the KPI section.
fn generate_kpi_section(kpis: &[Kpi]) -> String {
    let mut section = String::new();

    section.push_str("## Sales Key Performance Indicators (KPIs)\n\n");
    for kpi in kpis {
        section.push_str(&format!("- {}\n", kpi.formatted()));
    }
    section.push('\n');

    section
}

/// Generate one insight section.
fn generate_insight_section(insight: &InsightSection) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", insight.heading));

    for exhibit in &insight.exhibits {
        match exhibit {
            Exhibit::Chart { chart, .. } => {
                section.push_str(&format!(
                    "![{}]({}/{})\n\n",
                    chart.title,
                    CHARTS_DIR,
                    chart.file_name()
                ));
            }
            Exhibit::Statistic {
                label,
                value,
                decimals,
            } => {
                section.push_str(&format!("{}: **{:.*}**\n\n", label, *decimals, value));
            }
        }
    }

    section.push_str(&insight.narrative);
    section.push_str("\n\n");

    if !insight.recommendations.is_empty() {
        section.push_str("### Business Recommendation\n\n");
        for (i, rec) in insight.recommendations.iter().enumerate() {
            section.push_str(&format!("{}. {}\n", i + 1, rec));
        }
        section.push('\n');
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by salescope v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

fn table_row(cells: &[String]) -> String {
    let escaped: Vec<String> = cells
        .iter()
        .map(|c| {
            c.replace('|', "\\|")
                .replace("\r\n", "<br>")
                .replace('\n', "<br>")
                .replace('\r', "<br>")
        })
        .collect();
    format!("| {} |\n", escaped.join(" | "))
}

/// Generate a JSON report.
pub fn generate_json_report(report: &ReportDocument) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write every chart as `<dir>/charts/<slug>.svg`, returning the paths written.
pub fn write_charts(
    report: &ReportDocument,
    output_dir: &Path,
    show_progress: bool,
) -> Result<Vec<PathBuf>> {
    let charts_dir = output_dir.join(CHARTS_DIR);
    std::fs::create_dir_all(&charts_dir)
        .with_context(|| format!("Failed to create {}", charts_dir.display()))?;

    let charts: Vec<_> = report.charts().collect();

    let progress_bar = if show_progress {
        let pb = ProgressBar::new(charts.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .context("Invalid progress template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut written = Vec::with_capacity(charts.len());
    for chart in charts {
        let path = charts_dir.join(chart.file_name());
        std::fs::write(&path, &chart.svg)
            .with_context(|| format!("Failed to write chart to {}", path.display()))?;
        debug!("Wrote {}", path.display());

        if let Some(ref pb) = progress_bar {
            pb.set_message(chart.title.clone());
            pb.inc(1);
        }
        written.push(path);
    }

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    info!("Wrote {} charts to {}", written.len(), charts_dir.display());
    Ok(written)
}
