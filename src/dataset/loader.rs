//! Delimited-file loading.
//!
//! This module reads a header-first delimited text file into a
//! [`Dataset`], keeping both the raw cells and the typed records.

use crate::error::LoadError;
use crate::models::{Column, Dataset, Record};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Default field delimiter.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Load a dataset from `path`.
///
/// Every row must have as many fields as the header and must provide
/// the contract columns; anything else is a [`LoadError`].
pub fn load_dataset(path: &Path, delimiter: u8) -> Result<Dataset, LoadError> {
    info!("Loading dataset: {}", path.display());

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| LoadError::Malformed { line: 1, source })?
        .clone();

    for column in Column::ALL {
        if !headers.iter().any(|h| h == column.header()) {
            return Err(LoadError::MissingColumn(column.header()));
        }
    }
    debug!("Header has {} columns", headers.len());

    let mut dataset = Dataset {
        headers: headers.iter().map(String::from).collect(),
        rows: Vec::new(),
        records: Vec::new(),
    };

    for result in reader.records() {
        let row = result.map_err(|source| LoadError::Malformed {
            line: source.position().map(|p| p.line()).unwrap_or(0),
            source,
        })?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let record: Record = row
            .deserialize(Some(&headers))
            .map_err(|source| LoadError::Malformed { line, source })?;

        dataset.rows.push(row.iter().map(String::from).collect());
        dataset.records.push(record);
    }

    info!("Loaded {} records", dataset.len());
    Ok(dataset)
}
