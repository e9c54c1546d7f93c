//! Editor core error types

use std::path::PathBuf;

use genie_transport::DeviceError;
use thiserror::Error;

/// Grid addressing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Cell outside the device matrix
    #[error("Cell ({row}, {col}) outside {rows}x{cols} matrix")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Row outside the device matrix
    #[error("Row {row} outside matrix with {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },

    /// Matrix has no columns to address
    #[error("Matrix has no columns")]
    NoColumns,

    /// Button handle not issued by this editor
    #[error("Unknown button {0}")]
    UnknownButton(usize),
}

/// Layout descriptor loading errors
#[derive(Error, Debug)]
pub enum LayoutError {
    /// File not present in a source
    #[error("{0} not found")]
    Missing(PathBuf),

    /// File present but unreadable
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not a valid layout descriptor
    #[error("Invalid layout document {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// No source produced a usable document
    #[error("Layout {name}.json not found (tried: {})", .attempts.join("; "))]
    NotFound { name: String, attempts: Vec<String> },
}

/// Failures of the row synchronization protocol
#[derive(Error, Debug)]
pub enum SyncError {
    /// The row definition call failed; display was not attempted
    #[error("Defining row {row} failed: {source}")]
    Define {
        row: usize,
        #[source]
        source: DeviceError,
    },

    /// The display commit failed after the row(s) were defined
    #[error("Displaying custom frame failed: {source}")]
    Display {
        #[source]
        source: DeviceError,
    },

    /// Request did not address the matrix
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}
