//! Report assembly.
//!
//! Loads and normalizes the dataset, then walks the fixed insight list,
//! pairing each aggregate with its chart and template text.

use super::insights::{InsightTemplate, INSIGHTS};
use crate::analysis::{correlation, mean_by, scalar_kpis, sort_by_value_desc, sum_by};
use crate::chart::{bar, grouped_bar, line, pie, ChartSize};
use crate::dataset::{load_dataset, normalize, DEFAULT_DELIMITER};
use crate::error::ReportError;
use crate::models::{
    Column, DataTable, Dataset, Exhibit, InsightId, InsightSection, ReportDocument,
    ReportMetadata,
};
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Settings that shape the generated document.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Document title.
    pub title: String,
    /// Field delimiter of the dataset file.
    pub delimiter: u8,
    /// Cap on rows shown in the data overview (None shows all).
    pub table_rows: Option<usize>,
    /// Pixels per inch when sizing charts.
    pub pixels_per_inch: u32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "Blinkit Data Analysis".to_string(),
            delimiter: DEFAULT_DELIMITER,
            table_rows: None,
            pixels_per_inch: 100,
        }
    }
}

impl From<&crate::config::Config> for ReportOptions {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            title: config.report.title.clone(),
            delimiter: config.data.delimiter_byte(),
            table_rows: config.report.table_rows,
            pixels_per_inch: config.charts.pixels_per_inch,
        }
    }
}

/// Generate the full report document for the dataset at `dataset_path`.
///
/// Any load, aggregation or rendering failure aborts the whole report.
pub fn generate_report(
    dataset_path: &Path,
    options: &ReportOptions,
) -> Result<ReportDocument, ReportError> {
    let start_time = Instant::now();

    let dataset = normalize(load_dataset(dataset_path, options.delimiter)?);
    if dataset.is_empty() {
        warn!("Dataset {} has no data rows", dataset_path.display());
    }
    let kpis = scalar_kpis(&dataset)?;
    info!(
        "Total sales {:.2} over {} items",
        kpis.total_sales, kpis.item_count
    );

    let mut sections = Vec::with_capacity(INSIGHTS.len());
    for template in &INSIGHTS {
        debug!("Building insight: {}", template.heading);
        sections.push(build_section(&dataset, template, options)?);
    }

    let metadata = ReportMetadata {
        dataset_path: dataset_path.display().to_string(),
        generated_at: Utc::now(),
        row_count: dataset.len(),
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    Ok(ReportDocument {
        metadata,
        title: options.title.clone(),
        data_table: data_table(&dataset, options.table_rows),
        kpis: kpis.to_kpis(),
        sections,
    })
}

fn data_table(dataset: &Dataset, limit: Option<usize>) -> DataTable {
    let shown = limit.unwrap_or(dataset.rows.len());
    DataTable {
        headers: dataset.headers.clone(),
        rows: dataset.rows.iter().take(shown).cloned().collect(),
        total_rows: dataset.rows.len(),
    }
}

fn build_section(
    dataset: &Dataset,
    template: &InsightTemplate,
    options: &ReportOptions,
) -> Result<InsightSection, ReportError> {
    let figure = |w: f64, h: f64| ChartSize::from_inches(w, h, options.pixels_per_inch);

    let exhibits = match template.id {
        InsightId::FatContentShare => {
            let aggregate = sum_by(dataset, &[Column::ItemFatContent], Column::Sales)?;
            let chart = pie(&aggregate, "Sales by Fat Content", figure(4.0, 4.0))?;
            vec![Exhibit::Chart { aggregate, chart }]
        }
        InsightId::TopItemTypes => {
            let aggregate =
                sort_by_value_desc(&sum_by(dataset, &[Column::ItemType], Column::Sales)?);
            let chart = bar(
                &aggregate,
                "Sales by Item Type",
                "Item Type",
                "Sales",
                figure(8.0, 4.0),
            )?;
            vec![Exhibit::Chart { aggregate, chart }]
        }
        InsightId::FatContentByItemType => {
            let aggregate = sum_by(
                dataset,
                &[Column::ItemType, Column::ItemFatContent],
                Column::Sales,
            )?;
            let chart = grouped_bar(
                &aggregate.pivot(0)?,
                "Sales by Item Type and Fat Content",
                "Item Type",
                "Total Sales",
                figure(8.0, 5.0),
            )?;
            vec![Exhibit::Chart { aggregate, chart }]
        }
        InsightId::OutletAge => {
            let aggregate = sum_by(dataset, &[Column::OutletEstablishmentYear], Column::Sales)?;
            let chart = line(
                &aggregate,
                "Total Sales by Outlet Establishment",
                "Outlet Establishment Year",
                "Sales",
                figure(8.0, 4.0),
            )?;
            vec![Exhibit::Chart { aggregate, chart }]
        }
        InsightId::OutletSizeAndType => {
            let by_size = sum_by(dataset, &[Column::OutletSize], Column::Sales)?;
            let size_chart = pie(&by_size, "Sales by Outlet Size", figure(6.0, 6.0))?;
            let by_type = sum_by(dataset, &[Column::OutletType], Column::Sales)?;
            let type_chart = pie(&by_type, "Sales by Outlet Type", figure(8.0, 5.0))?;
            vec![
                Exhibit::Chart {
                    aggregate: by_size,
                    chart: size_chart,
                },
                Exhibit::Chart {
                    aggregate: by_type,
                    chart: type_chart,
                },
            ]
        }
        InsightId::LocationTier => {
            let total = sum_by(dataset, &[Column::OutletLocationType], Column::Sales)?;
            let total_chart = pie(&total, "Sales by Outlet Location", figure(8.0, 5.0))?;
            let average = mean_by(dataset, &[Column::OutletLocationType], Column::Sales)?;
            let average_chart = bar(
                &average,
                "Average Sales by Outlet Location",
                "Outlet Location Type",
                "Average Sales",
                figure(8.0, 4.0),
            )?;
            vec![
                Exhibit::Chart {
                    aggregate: total,
                    chart: total_chart,
                },
                Exhibit::Chart {
                    aggregate: average,
                    chart: average_chart,
                },
            ]
        }
        InsightId::WeightCorrelation => {
            let value = correlation(dataset, Column::ItemWeight, Column::Sales)?;
            vec![Exhibit::Statistic {
                label: "Correlation between Item Weight and Sales".to_string(),
                value,
                decimals: 2,
            }]
        }
        InsightId::SizeTypeCombination => {
            let aggregate = sum_by(
                dataset,
                &[Column::OutletSize, Column::OutletType],
                Column::Sales,
            )?;
            let chart = grouped_bar(
                &aggregate.pivot(1)?,
                "Best Sales by Outlet Size and Type",
                "Outlet Type",
                "Total Sales",
                figure(12.0, 6.0),
            )?;
            vec![Exhibit::Chart { aggregate, chart }]
        }
    };

    Ok(InsightSection {
        id: template.id,
        heading: template.heading.to_string(),
        exhibits,
        narrative: template.narrative.to_string(),
        recommendations: template
            .recommendations
            .iter()
            .map(|r| r.to_string())
            .collect(),
    })
}
