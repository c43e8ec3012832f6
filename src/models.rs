//! Data models for the sales report.
//!
//! This module contains the core data structures used throughout
//! the application for representing records, group keys, and the
//! generated report document.

use crate::analysis::Aggregate;
use crate::chart::Chart;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of values a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free-form or enumerated labels.
    Categorical,
    /// Whole numbers; usable both as a group key and as a value.
    Integer,
    /// Measurements; usable only as a value.
    Float,
}

/// The columns a dataset file must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    ItemIdentifier,
    ItemFatContent,
    ItemType,
    ItemWeight,
    OutletIdentifier,
    OutletEstablishmentYear,
    OutletSize,
    OutletLocationType,
    OutletType,
    Sales,
    Rating,
}

impl Column {
    /// All contract columns in file order.
    pub const ALL: [Column; 11] = [
        Column::ItemIdentifier,
        Column::ItemFatContent,
        Column::ItemType,
        Column::ItemWeight,
        Column::OutletIdentifier,
        Column::OutletEstablishmentYear,
        Column::OutletSize,
        Column::OutletLocationType,
        Column::OutletType,
        Column::Sales,
        Column::Rating,
    ];

    /// Header text of the column in the input file.
    pub fn header(&self) -> &'static str {
        match self {
            Column::ItemIdentifier => "Item Identifier",
            Column::ItemFatContent => "Item Fat Content",
            Column::ItemType => "Item Type",
            Column::ItemWeight => "Item Weight",
            Column::OutletIdentifier => "Outlet Identifier",
            Column::OutletEstablishmentYear => "Outlet Establishment Year",
            Column::OutletSize => "Outlet Size",
            Column::OutletLocationType => "Outlet Location Type",
            Column::OutletType => "Outlet Type",
            Column::Sales => "Sales",
            Column::Rating => "Rating",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::ItemWeight | Column::Sales | Column::Rating => ColumnKind::Float,
            Column::OutletEstablishmentYear => ColumnKind::Integer,
            _ => ColumnKind::Categorical,
        }
    }

    /// Whether the column can partition records into groups.
    pub fn is_groupable(&self) -> bool {
        self.kind() != ColumnKind::Float
    }

    /// Whether the column can be summed, averaged or correlated.
    pub fn is_numeric(&self) -> bool {
        self.kind() != ColumnKind::Categorical
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// A single group-key cell.
///
/// Integers order before text; within a variant values ascend.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Text(String),
}

impl Key {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(v) => Some(*v),
            Key::Text(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(v) => write!(f, "{}", v),
            Key::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Join a composite key for labels, e.g. `"Snack Foods / Low Fat"`.
pub fn key_label(key: &[Key]) -> String {
    key.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// One row of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Item Identifier")]
    pub item_identifier: String,
    #[serde(rename = "Item Fat Content")]
    pub fat_content: String,
    #[serde(rename = "Item Type")]
    pub item_type: String,
    #[serde(rename = "Item Weight")]
    pub item_weight: Option<f64>,
    #[serde(rename = "Outlet Identifier")]
    pub outlet_identifier: String,
    #[serde(rename = "Outlet Establishment Year")]
    pub establishment_year: i64,
    #[serde(rename = "Outlet Size")]
    pub outlet_size: Option<String>,
    #[serde(rename = "Outlet Location Type")]
    pub location_type: String,
    #[serde(rename = "Outlet Type")]
    pub outlet_type: String,
    #[serde(rename = "Sales")]
    pub sales: Option<f64>,
    #[serde(rename = "Rating")]
    pub rating: Option<f64>,
}

impl Record {
    /// Group-key view of a cell. `None` for float columns and null cells.
    pub fn key(&self, column: Column) -> Option<Key> {
        let text = |s: &str| {
            if s.is_empty() {
                None
            } else {
                Some(Key::Text(s.to_string()))
            }
        };

        match column {
            Column::ItemIdentifier => text(&self.item_identifier),
            Column::ItemFatContent => text(&self.fat_content),
            Column::ItemType => text(&self.item_type),
            Column::OutletIdentifier => text(&self.outlet_identifier),
            Column::OutletEstablishmentYear => Some(Key::Int(self.establishment_year)),
            Column::OutletSize => self.outlet_size.as_deref().and_then(text),
            Column::OutletLocationType => text(&self.location_type),
            Column::OutletType => text(&self.outlet_type),
            Column::ItemWeight | Column::Sales | Column::Rating => None,
        }
    }

    /// Numeric view of a cell. `None` for categorical columns and null cells.
    pub fn number(&self, column: Column) -> Option<f64> {
        let value = match column {
            Column::ItemWeight => self.item_weight,
            Column::OutletEstablishmentYear => Some(self.establishment_year as f64),
            Column::Sales => self.sales,
            Column::Rating => self.rating,
            _ => None,
        };
        value.filter(|v| !v.is_nan())
    }
}

/// The loaded table: raw cells for display plus typed records for analysis.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Header row exactly as read.
    pub headers: Vec<String>,
    /// Raw rows exactly as read, before normalization.
    pub rows: Vec<Vec<String>>,
    /// Typed records, one per row.
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build a dataset from typed records alone (raw table left empty).
    #[cfg(test)]
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            headers: Vec::new(),
            rows: Vec::new(),
            records,
        }
    }
}

/// Headline statistics shown at the top of the report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_sales: f64,
    pub average_sales: f64,
    pub item_count: usize,
    pub average_rating: f64,
}

/// A single labelled KPI as displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub label: String,
    pub value: f64,
    /// Decimal places used when formatting.
    pub decimals: usize,
    /// Prefix the value with a dollar sign.
    pub currency: bool,
}

impl Kpi {
    /// Format as `"Label: $1234.50"`.
    pub fn formatted(&self) -> String {
        let sign = if self.currency { "$" } else { "" };
        format!(
            "{}: {}{:.*}",
            self.label, sign, self.decimals, self.value
        )
    }
}

impl KpiSummary {
    /// Display order: total sales, average sales, item count, average rating.
    pub fn to_kpis(&self) -> Vec<Kpi> {
        vec![
            Kpi {
                label: "Total Sales".to_string(),
                value: self.total_sales,
                decimals: 2,
                currency: true,
            },
            Kpi {
                label: "Average Sales".to_string(),
                value: self.average_sales,
                decimals: 2,
                currency: true,
            },
            Kpi {
                label: "Total number of items sold".to_string(),
                value: self.item_count as f64,
                decimals: 0,
                currency: false,
            },
            Kpi {
                label: "Average Rating".to_string(),
                value: self.average_rating,
                decimals: 2,
                currency: false,
            },
        ]
    }
}

/// The raw data overview table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Number of rows in the dataset, which may exceed `rows.len()`.
    pub total_rows: usize,
}

/// Identifies one of the fixed report insights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightId {
    FatContentShare,
    TopItemTypes,
    FatContentByItemType,
    OutletAge,
    OutletSizeAndType,
    LocationTier,
    WeightCorrelation,
    SizeTypeCombination,
}

/// A piece of evidence inside an insight section.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Exhibit {
    /// A rendered chart and the aggregate it was drawn from.
    Chart { aggregate: Aggregate, chart: Chart },
    /// A single labelled number.
    Statistic {
        label: String,
        value: f64,
        decimals: usize,
    },
}

impl Exhibit {
    pub fn chart(&self) -> Option<&Chart> {
        match self {
            Exhibit::Chart { chart, .. } => Some(chart),
            Exhibit::Statistic { .. } => None,
        }
    }
}

/// One question-driven report section.
#[derive(Debug, Clone, Serialize)]
pub struct InsightSection {
    pub id: InsightId,
    pub heading: String,
    pub exhibits: Vec<Exhibit>,
    pub narrative: String,
    pub recommendations: Vec<String>,
}

/// Metadata about the generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the dataset file.
    pub dataset_path: String,
    /// Date and time of generation.
    pub generated_at: DateTime<Utc>,
    /// Number of records loaded.
    pub row_count: usize,
    /// Duration of the analysis in seconds.
    pub duration_seconds: f64,
}

/// The complete report document.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub metadata: ReportMetadata,
    pub title: String,
    pub data_table: DataTable,
    pub kpis: Vec<Kpi>,
    pub sections: Vec<InsightSection>,
}

impl ReportDocument {
    /// Every chart in report order.
    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.sections
            .iter()
            .flat_map(|s| s.exhibits.iter())
            .filter_map(Exhibit::chart)
    }
}

/// Build a representative record for tests.
#[cfg(test)]
pub(crate) fn sample_record(fat: &str, item_type: &str, sales: f64) -> Record {
    Record {
        item_identifier: "FDA15".to_string(),
        fat_content: fat.to_string(),
        item_type: item_type.to_string(),
        item_weight: Some(9.3),
        outlet_identifier: "OUT049".to_string(),
        establishment_year: 1999,
        outlet_size: Some("Medium".to_string()),
        location_type: "Tier 1".to_string(),
        outlet_type: "Supermarket Type1".to_string(),
        sales: Some(sales),
        rating: Some(5.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ordering() {
        assert!(Key::Int(1998) < Key::Int(2010));
        assert!(Key::Text("Dairy".into()) < Key::Text("Snacks".into()));
        assert!(Key::Int(9999) < Key::Text("0".into()));
    }

    #[test]
    fn test_record_key_and_number() {
        let mut r = sample_record("Low Fat", "Dairy", 120.5);
        assert_eq!(r.key(Column::ItemType), Some(Key::Text("Dairy".into())));
        assert_eq!(r.key(Column::OutletEstablishmentYear), Some(Key::Int(1999)));
        assert_eq!(r.key(Column::Sales), None);
        assert_eq!(r.number(Column::Sales), Some(120.5));
        assert_eq!(r.number(Column::ItemType), None);

        r.outlet_size = None;
        r.item_weight = None;
        assert_eq!(r.key(Column::OutletSize), None);
        assert_eq!(r.number(Column::ItemWeight), None);
    }

    #[test]
    fn test_column_kinds() {
        assert!(Column::OutletEstablishmentYear.is_groupable());
        assert!(Column::OutletEstablishmentYear.is_numeric());
        assert!(!Column::Sales.is_groupable());
        assert!(!Column::ItemType.is_numeric());
        assert_eq!(Column::OutletLocationType.header(), "Outlet Location Type");
    }

    #[test]
    fn test_kpi_formatting() {
        let summary = KpiSummary {
            total_sales: 1201681.4808,
            average_sales: 140.99278,
            item_count: 8523,
            average_rating: 3.965857,
        };
        let lines: Vec<String> = summary.to_kpis().iter().map(Kpi::formatted).collect();
        assert_eq!(lines[0], "Total Sales: $1201681.48");
        assert_eq!(lines[1], "Average Sales: $140.99");
        assert_eq!(lines[2], "Total number of items sold: 8523");
        assert_eq!(lines[3], "Average Rating: 3.97");
    }

    #[test]
    fn test_key_label() {
        let key = vec![Key::Text("Snack Foods".into()), Key::Text("Low Fat".into())];
        assert_eq!(key_label(&key), "Snack Foods / Low Fat");
    }
}
