//! Sales aggregation and statistics.
//!
//! This module provides the descriptive statistics behind the report:
//! headline KPIs, grouped sums/means/counts, pivots and correlation.
//! Every function is a pure function of the dataset.

use crate::error::ComputeError;
use crate::models::{key_label, Column, Dataset, Key, KpiSummary};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Statistic computed per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Sum,
    Mean,
    Count,
}

/// One group of an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEntry {
    pub key: Vec<Key>,
    pub value: f64,
}

impl GroupEntry {
    pub fn label(&self) -> String {
        key_label(&self.key)
    }
}

/// Result of a grouped aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    pub group_keys: Vec<Column>,
    pub value_column: Column,
    pub stat: Stat,
    pub entries: Vec<GroupEntry>,
}

impl Aggregate {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all group values.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }

    /// Look up a group by its key.
    #[cfg(test)]
    pub fn get(&self, key: &[Key]) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.key.as_slice() == key)
            .map(|e| e.value)
    }

    /// Unstack a two-key aggregate.
    ///
    /// `primary` selects which key becomes the row; the other becomes the
    /// series. Missing combinations are `None`.
    pub fn pivot(&self, primary: usize) -> Result<Pivot, ComputeError> {
        if self.group_keys.len() != 2 || primary > 1 {
            return Err(ComputeError::WrongKeyCount {
                expected: 2,
                actual: self.group_keys.len(),
            });
        }
        let secondary = 1 - primary;

        let mut cells: BTreeMap<Key, BTreeMap<Key, f64>> = BTreeMap::new();
        for entry in &self.entries {
            cells
                .entry(entry.key[primary].clone())
                .or_default()
                .insert(entry.key[secondary].clone(), entry.value);
        }

        let mut series: Vec<Key> = self
            .entries
            .iter()
            .map(|e| e.key[secondary].clone())
            .collect();
        series.sort();
        series.dedup();

        let rows: Vec<Key> = cells.keys().cloned().collect();
        let values = rows
            .iter()
            .map(|row| {
                let by_series = &cells[row];
                series.iter().map(|s| by_series.get(s).copied()).collect()
            })
            .collect();

        Ok(Pivot {
            row_column: self.group_keys[primary],
            series_column: self.group_keys[secondary],
            rows,
            series,
            values,
        })
    }
}

/// A two-key aggregate laid out as rows by series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pivot {
    pub row_column: Column,
    pub series_column: Column,
    pub rows: Vec<Key>,
    pub series: Vec<Key>,
    /// `values[row][series]`.
    pub values: Vec<Vec<Option<f64>>>,
}

/// Compute the headline KPIs.
pub fn scalar_kpis(dataset: &Dataset) -> Result<KpiSummary, ComputeError> {
    let sales: Vec<f64> = numeric_values(dataset, Column::Sales);
    if sales.is_empty() {
        return Err(ComputeError::EmptyColumn(Column::Sales));
    }

    let ratings: Vec<f64> = numeric_values(dataset, Column::Rating);
    if ratings.is_empty() {
        return Err(ComputeError::EmptyColumn(Column::Rating));
    }

    let total_sales: f64 = sales.iter().sum();
    let item_count = sales.len();

    Ok(KpiSummary {
        total_sales,
        average_sales: total_sales / item_count as f64,
        item_count,
        average_rating: ratings.iter().sum::<f64>() / ratings.len() as f64,
    })
}

/// Group records by `keys` and reduce `value` with `stat`.
///
/// Records with a null key cell or a null value are skipped, so groups
/// without any usable value never appear. Entries are ordered by key.
pub fn group_by(
    dataset: &Dataset,
    keys: &[Column],
    value: Column,
    stat: Stat,
) -> Result<Aggregate, ComputeError> {
    if keys.is_empty() {
        return Err(ComputeError::NoGroupKeys);
    }
    if let Some(column) = keys.iter().find(|c| !c.is_groupable()) {
        return Err(ComputeError::NotGroupable(*column));
    }
    if !value.is_numeric() {
        return Err(ComputeError::NotNumeric(value));
    }

    // key -> (sum, count)
    let mut groups: BTreeMap<Vec<Key>, (f64, usize)> = BTreeMap::new();

    for record in &dataset.records {
        let Some(key) = keys
            .iter()
            .map(|c| record.key(*c))
            .collect::<Option<Vec<Key>>>()
        else {
            continue;
        };
        let Some(v) = record.number(value) else {
            continue;
        };

        let slot = groups.entry(key).or_insert((0.0, 0));
        slot.0 += v;
        slot.1 += 1;
    }

    let entries: Vec<GroupEntry> = groups
        .into_iter()
        .map(|(key, (sum, count))| GroupEntry {
            key,
            value: match stat {
                Stat::Sum => sum,
                Stat::Mean => sum / count as f64,
                Stat::Count => count as f64,
            },
        })
        .collect();

    debug!(
        "Grouped {} by {:?}: {} groups",
        value,
        keys,
        entries.len()
    );

    Ok(Aggregate {
        group_keys: keys.to_vec(),
        value_column: value,
        stat,
        entries,
    })
}

/// Sum of `value` per group.
pub fn sum_by(dataset: &Dataset, keys: &[Column], value: Column) -> Result<Aggregate, ComputeError> {
    group_by(dataset, keys, value, Stat::Sum)
}

/// Mean of `value` per group.
pub fn mean_by(
    dataset: &Dataset,
    keys: &[Column],
    value: Column,
) -> Result<Aggregate, ComputeError> {
    group_by(dataset, keys, value, Stat::Mean)
}

/// Number of non-null `value` cells per group.
#[allow(dead_code)] // Used by tests; no insight charts record counts
pub fn count_by(
    dataset: &Dataset,
    keys: &[Column],
    value: Column,
) -> Result<Aggregate, ComputeError> {
    group_by(dataset, keys, value, Stat::Count)
}

/// Sort groups by value, highest first.
///
/// The sort is stable: groups with exactly equal values keep their
/// grouped (ascending key) order.
pub fn sort_by_value_desc(aggregate: &Aggregate) -> Aggregate {
    let mut sorted = aggregate.clone();
    sorted
        .entries
        .sort_by(|a, b| b.value.total_cmp(&a.value));
    sorted
}

/// Pearson correlation between two numeric columns.
///
/// Only rows where both cells are non-null contribute.
pub fn correlation(dataset: &Dataset, a: Column, b: Column) -> Result<f64, ComputeError> {
    for column in [a, b] {
        if !column.is_numeric() {
            return Err(ComputeError::NotNumeric(column));
        }
    }

    let pairs: Vec<(f64, f64)> = dataset
        .records
        .iter()
        .filter_map(|r| Some((r.number(a)?, r.number(b)?)))
        .collect();

    if pairs.len() < 2 {
        return Err(ComputeError::UndefinedCorrelation(a, b));
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return Err(ComputeError::UndefinedCorrelation(a, b));
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    Ok(r.clamp(-1.0, 1.0))
}

fn numeric_values(dataset: &Dataset, column: Column) -> Vec<f64> {
    dataset
        .records
        .iter()
        .filter_map(|r| r.number(column))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{load_dataset, normalize, DEFAULT_DELIMITER};
    use crate::models::sample_record;
    use std::path::Path;

    const EPS: f64 = 1e-9;

    fn text(s: &str) -> Key {
        Key::Text(s.to_string())
    }

    fn fixture() -> Dataset {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/sales_sample.csv");
        normalize(load_dataset(&path, DEFAULT_DELIMITER).unwrap())
    }

    #[test]
    fn test_fat_content_scenario() {
        let dataset = normalize(Dataset::from_records(vec![
            sample_record("LF", "Dairy", 10.0),
            sample_record("Regular", "Dairy", 20.0),
            sample_record("low fat", "Dairy", 5.0),
        ]));

        let agg = sum_by(&dataset, &[Column::ItemFatContent], Column::Sales).unwrap();
        assert_eq!(agg.len(), 2);
        assert_eq!(agg.get(&[text("Low Fat")]), Some(15.0));
        assert_eq!(agg.get(&[text("Regular")]), Some(20.0));
    }

    #[test]
    fn test_descending_sort_tie_keeps_key_order() {
        let dataset = Dataset::from_records(vec![
            sample_record("Low Fat", "Snacks", 10.0),
            sample_record("Low Fat", "Snacks", 20.0),
            sample_record("Low Fat", "Dairy", 30.0),
        ]);

        let agg = sum_by(&dataset, &[Column::ItemType], Column::Sales).unwrap();
        let sorted = sort_by_value_desc(&agg);

        let got: Vec<(String, f64)> = sorted
            .entries
            .iter()
            .map(|e| (e.label(), e.value))
            .collect();
        assert_eq!(
            got,
            vec![("Dairy".to_string(), 30.0), ("Snacks".to_string(), 30.0)]
        );
        // Input aggregate untouched
        assert_eq!(agg.entries[0].label(), "Dairy");
    }

    #[test]
    fn test_descending_sort() {
        let agg = sum_by(&fixture(), &[Column::ItemType], Column::Sales).unwrap();
        let sorted = sort_by_value_desc(&agg);

        let labels: Vec<String> = sorted.entries.iter().map(GroupEntry::label).collect();
        assert_eq!(
            labels,
            vec![
                "Frozen Foods",
                "Canned",
                "Fruits and Vegetables",
                "Health and Hygiene",
                "Starchy Foods",
                "Household",
                "Soft Drinks"
            ]
        );
        assert!(sorted
            .entries
            .windows(2)
            .all(|w| w[0].value >= w[1].value));
    }

    #[test]
    fn test_scalar_kpis() {
        let kpis = scalar_kpis(&fixture()).unwrap();
        assert!((kpis.total_sales - 1410.0).abs() < EPS);
        assert_eq!(kpis.item_count, 12);
        assert!((kpis.average_sales - kpis.total_sales / 12.0).abs() < EPS);
        assert!((kpis.average_rating - 51.5 / 12.0).abs() < EPS);
    }

    #[test]
    fn test_scalar_kpis_empty() {
        assert_eq!(
            scalar_kpis(&Dataset::default()),
            Err(ComputeError::EmptyColumn(Column::Sales))
        );
    }

    #[test]
    fn test_groupings_partition_rows() {
        let dataset = fixture();
        let groupings: Vec<Vec<Column>> = vec![
            vec![Column::ItemFatContent],
            vec![Column::ItemType],
            vec![Column::ItemType, Column::ItemFatContent],
            vec![Column::OutletEstablishmentYear],
            vec![Column::OutletSize],
            vec![Column::OutletType],
            vec![Column::OutletLocationType],
            vec![Column::OutletSize, Column::OutletType],
        ];

        for keys in groupings {
            let agg = sum_by(&dataset, &keys, Column::Sales).unwrap();
            let expected: f64 = dataset
                .records
                .iter()
                .filter(|r| keys.iter().all(|k| r.key(*k).is_some()))
                .filter_map(|r| r.number(Column::Sales))
                .sum();
            assert!(
                (agg.total() - expected).abs() < EPS,
                "grouping {:?} lost rows",
                keys
            );
        }
    }

    #[test]
    fn test_null_outlet_size_is_dropped() {
        let agg = sum_by(&fixture(), &[Column::OutletSize], Column::Sales).unwrap();
        let labels: Vec<String> = agg.entries.iter().map(GroupEntry::label).collect();
        assert_eq!(labels, vec!["High", "Medium", "Small"]);
        assert!((agg.total() - (1410.0 - 253.6)).abs() < 1e-6);
    }

    #[test]
    fn test_year_series_ascending() {
        let agg = sum_by(&fixture(), &[Column::OutletEstablishmentYear], Column::Sales).unwrap();
        let years: Vec<i64> = agg
            .entries
            .iter()
            .filter_map(|e| e.key[0].as_int())
            .collect();
        assert_eq!(years, vec![1998, 2000, 2011, 2012, 2014, 2015, 2016, 2020, 2022]);
        assert!((agg.get(&[Key::Int(2012)]).unwrap() - 197.5).abs() < EPS);
    }

    #[test]
    fn test_mean_and_count_skip_nulls() {
        let mut a = sample_record("Low Fat", "Dairy", 10.0);
        let mut b = sample_record("Low Fat", "Dairy", 30.0);
        let mut c = sample_record("Low Fat", "Snacks", 0.0);
        a.item_weight = Some(2.0);
        b.item_weight = None;
        c.item_weight = None;
        let dataset = Dataset::from_records(vec![a, b, c]);

        let mean = mean_by(&dataset, &[Column::ItemType], Column::Sales).unwrap();
        assert_eq!(mean.get(&[text("Dairy")]), Some(20.0));

        let weights = count_by(&dataset, &[Column::ItemType], Column::ItemWeight).unwrap();
        assert_eq!(weights.get(&[text("Dairy")]), Some(1.0));
        // Snacks has no weight at all, so it is omitted rather than zero
        assert_eq!(weights.get(&[text("Snacks")]), None);
        assert_eq!(weights.len(), 1);
    }

    #[test]
    fn test_group_by_rejects_bad_columns() {
        let dataset = fixture();
        assert_eq!(
            sum_by(&dataset, &[], Column::Sales),
            Err(ComputeError::NoGroupKeys)
        );
        assert_eq!(
            sum_by(&dataset, &[Column::Sales], Column::Sales),
            Err(ComputeError::NotGroupable(Column::Sales))
        );
        assert_eq!(
            sum_by(&dataset, &[Column::ItemType], Column::OutletType),
            Err(ComputeError::NotNumeric(Column::OutletType))
        );
    }

    #[test]
    fn test_pivot_missing_combinations() {
        let agg = sum_by(
            &fixture(),
            &[Column::ItemType, Column::ItemFatContent],
            Column::Sales,
        )
        .unwrap();
        let pivot = agg.pivot(0).unwrap();

        assert_eq!(pivot.series, vec![text("Low Fat"), text("Regular")]);
        assert_eq!(pivot.rows.len(), 7);

        let canned = pivot.rows.iter().position(|k| *k == text("Canned")).unwrap();
        assert_eq!(pivot.values[canned], vec![Some(181.9), Some(126.5)]);

        let household = pivot
            .rows
            .iter()
            .position(|k| *k == text("Household"))
            .unwrap();
        assert_eq!(pivot.values[household], vec![Some(96.0), None]);
    }

    #[test]
    fn test_pivot_swapped_primary() {
        let agg = sum_by(
            &fixture(),
            &[Column::OutletSize, Column::OutletType],
            Column::Sales,
        )
        .unwrap();
        let pivot = agg.pivot(1).unwrap();
        assert_eq!(pivot.row_column, Column::OutletType);
        assert_eq!(pivot.series_column, Column::OutletSize);
        assert_eq!(
            pivot.rows,
            vec![
                text("Grocery Store"),
                text("Supermarket Type1"),
                text("Supermarket Type2")
            ]
        );
        assert!(pivot
            .values
            .iter()
            .all(|row| row.iter().any(Option::is_some)));
    }

    #[test]
    fn test_pivot_requires_two_keys() {
        let agg = sum_by(&fixture(), &[Column::ItemType], Column::Sales).unwrap();
        assert_eq!(
            agg.pivot(0),
            Err(ComputeError::WrongKeyCount {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_correlation_symmetric_and_self() {
        let dataset = fixture();
        let ab = correlation(&dataset, Column::ItemWeight, Column::Sales).unwrap();
        let ba = correlation(&dataset, Column::Sales, Column::ItemWeight).unwrap();
        assert_eq!(ab, ba);
        assert!((-1.0..=1.0).contains(&ab));

        let self_corr = correlation(&dataset, Column::Sales, Column::Sales).unwrap();
        assert!((self_corr - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_perfect_negative() {
        let records = [(1.0, 30.0), (2.0, 20.0), (3.0, 10.0)]
            .into_iter()
            .map(|(w, s)| {
                let mut r = sample_record("Low Fat", "Dairy", s);
                r.item_weight = Some(w);
                r
            })
            .collect();
        let dataset = Dataset::from_records(records);
        let r = correlation(&dataset, Column::ItemWeight, Column::Sales).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_undefined() {
        let dataset = Dataset::from_records(vec![
            sample_record("Low Fat", "Dairy", 10.0),
            sample_record("Low Fat", "Dairy", 20.0),
        ]);
        // Constant weight has zero variance
        assert_eq!(
            correlation(&dataset, Column::ItemWeight, Column::Sales),
            Err(ComputeError::UndefinedCorrelation(
                Column::ItemWeight,
                Column::Sales
            ))
        );
        assert_eq!(
            correlation(&dataset, Column::ItemType, Column::Sales),
            Err(ComputeError::NotNumeric(Column::ItemType))
        );
    }
}
