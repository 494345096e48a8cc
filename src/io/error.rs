use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading input or writing output.
///
/// All of these are fatal for a run.
#[derive(Debug, Error)]
pub enum IoError {
    /// File could not be opened for reading.
    #[error("failed to open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File or directory could not be created.
    #[error("failed to create {path}: {source}")]
    FileCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Flushing buffered rows failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV or a row that does not fit the record type.
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Coordinate column did not parse (strict mode only). `row` counts data rows from 1.
    #[error("invalid {column} '{value}' in data row {row}")]
    InvalidCoordinate {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Result alias for file operations.
pub type Result<T> = std::result::Result<T, IoError>;
