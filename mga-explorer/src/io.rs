use mga_core::models::{DataError, Dimension, FeasibleRegion, SampleTable};
use std::{io::Read, path::Path, str::FromStr};
use thiserror::Error;

/// The on-disk layouts a sample table may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// An object mapping each dimension to its column, in column order
    Json,
    /// A header row of dimension names followed by one row per sample
    Csv,
}

impl TableFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }

    /// Read and validate a sample table in this format
    pub fn read<R: Read>(self, reader: R) -> Result<FeasibleRegion, TableError> {
        match self {
            Self::Json => read_json(reader),
            Self::Csv => read_csv(reader),
        }
    }
}

impl FromStr for TableFormat {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(TableError::UnknownFormat(s.to_owned())),
        }
    }
}

/// The ways a sample table can fail to load
#[derive(Debug, Error)]
pub enum TableError {
    /// The JSON is malformed or not an object of numeric arrays
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The CSV is malformed
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// A CSV cell does not hold a number
    #[error("row {row}, column {column}: {value:?} is not a number")]
    NotANumber {
        /// Zero-based data row
        row: usize,
        /// The column's header
        column: String,
        /// The cell as read
        value: String,
    },
    /// The table parsed but does not describe a usable region
    #[error(transparent)]
    Data(#[from] DataError),
    /// Neither JSON nor CSV
    #[error("unknown sample table format: {0}")]
    UnknownFormat(String),
}

/// Read a JSON object of columns, e.g. `{"PV": [1.0, 2.0], "Wind": [3.0, 4.0]}`
pub fn read_json<R: Read>(reader: R) -> Result<FeasibleRegion, TableError> {
    let table: SampleTable = serde_json::from_reader(reader)?;
    Ok(FeasibleRegion::load(table)?)
}

/// Read a CSV table whose header names the dimensions
pub fn read_csv<R: Read>(reader: R) -> Result<FeasibleRegion, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let values = record
            .iter()
            .zip(headers.iter())
            .map(|(cell, column)| {
                cell.parse::<f64>().map_err(|_| TableError::NotANumber {
                    row,
                    column: column.to_owned(),
                    value: cell.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(values);
    }

    let dimensions = headers.iter().map(Dimension::from).collect();
    Ok(FeasibleRegion::from_rows(dimensions, rows)?)
}
