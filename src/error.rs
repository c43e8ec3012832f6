//! Error types for loading, computing and rendering.
//!
//! Each stage has its own error enum; [`ReportError`] wraps them for
//! callers that drive the whole pipeline.

use crate::models::Column;
use plotters::drawing::DrawingAreaErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to read the dataset file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset is missing required column \"{0}\"")]
    MissingColumn(&'static str),

    #[error("malformed dataset at line {line}: {source}")]
    Malformed {
        line: u64,
        #[source]
        source: csv::Error,
    },
}

/// Failure while aggregating.
#[derive(Debug, Error, PartialEq)]
pub enum ComputeError {
    #[error("column \"{0}\" has no values to aggregate")]
    EmptyColumn(Column),

    #[error("column \"{0}\" is not numeric")]
    NotNumeric(Column),

    #[error("column \"{0}\" cannot be used as a group key")]
    NotGroupable(Column),

    #[error("at least one group key is required")]
    NoGroupKeys,

    #[error("expected {expected} group keys, aggregate has {actual}")]
    WrongKeyCount { expected: usize, actual: usize },

    #[error("correlation between \"{0}\" and \"{1}\" is undefined")]
    UndefinedCorrelation(Column, Column),
}

/// Failure while drawing a chart.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("chart \"{0}\" has no data")]
    EmptySeries(String),

    #[error("pie chart \"{0}\" needs a positive total and no negative slices")]
    InvalidPieTotal(String),

    #[error("line chart \"{0}\" needs integer keys")]
    NonNumericAxis(String),

    #[error("drawing backend failed: {0}")]
    Backend(String),
}

impl<E> From<DrawingAreaErrorKind<E>> for RenderError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Backend(err.to_string())
    }
}

/// Any failure while generating a report document.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Compute(#[from] ComputeError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ComputeError::NotNumeric(Column::ItemType).to_string(),
            "column \"Item Type\" is not numeric"
        );
        assert_eq!(
            LoadError::MissingColumn("Sales").to_string(),
            "dataset is missing required column \"Sales\""
        );
    }

    #[test]
    fn test_report_error_wraps_stages() {
        let err: ReportError = ComputeError::NoGroupKeys.into();
        assert!(matches!(err, ReportError::Compute(ComputeError::NoGroupKeys)));
        assert_eq!(err.to_string(), "at least one group key is required");
    }
}
