//! Error types for FunnelLens.

use thiserror::Error;

/// Result type alias for FunnelLens operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for FunnelLens.
///
/// Every failure is fatal: the pipeline runs once, top to bottom, and the
/// first error aborts the run.
#[derive(Error, Debug)]
pub enum Error {
    // Ingest errors (10-19)
    #[error("input file has no header row: {0}")]
    MissingHeader(String),

    #[error("row {row}: expected {expected} columns, found {found}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column {column}: cannot parse {value:?} as a number")]
    BadNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("input contains no data rows")]
    EmptyInput,

    // Schema errors (20-29)
    #[error("reporting scopes disagree on column {column} at row {row}")]
    ScopeMismatch { column: &'static str, row: usize },

    // Math and model errors (30-39)
    #[error("numerical instability detected: {0}")]
    NumericalInstability(String),

    #[error("design matrix is singular or ill-conditioned")]
    SingularMatrix,

    #[error("insufficient data: {rows} rows for {params} parameters")]
    InsufficientData { rows: usize, params: usize },

    #[error("dimension mismatch: y has {y_len} rows, x column has {x_rows}")]
    DimensionMismatch { y_len: usize, x_rows: usize },

    #[error("quantile out of range: {0} (expected 0..=1)")]
    QuantileOutOfRange(f64),

    // Pivot errors (40-49)
    #[error("empty group: no rows for {0}")]
    EmptyGroup(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::MissingHeader(_) => 10,
            Error::ColumnCount { .. } => 11,
            Error::BadNumber { .. } => 12,
            Error::EmptyInput => 13,
            Error::ScopeMismatch { .. } => 20,
            Error::NumericalInstability(_) => 30,
            Error::SingularMatrix => 31,
            Error::InsufficientData { .. } => 32,
            Error::QuantileOutOfRange(_) => 33,
            Error::DimensionMismatch { .. } => 34,
            Error::EmptyGroup(_) => 40,
            Error::Io(_) => 60,
            Error::Csv(_) => 61,
            Error::Json(_) => 62,
        }
    }
}
