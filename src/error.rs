//! Error types for simplot.
//!
//! One error enum for the whole library, built with `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for simplot operations.
pub type Result<T> = std::result::Result<T, PlotError>;

/// Errors that can occur while building, finishing or saving a figure.
#[derive(Debug, Error)]
pub enum PlotError {
    /// A data source given as a path does not point at a file.
    #[error("Data source must be the path to a data file: {path}")]
    DataFile { path: PathBuf },

    /// Data file did not contain a JSON object at the top level.
    #[error("Data file {path} does not contain a key/value mapping")]
    NotAMapping { path: PathBuf },

    /// A required drawing parameter is absent.
    #[error("Missing required parameter: {0}")]
    MissingKey(String),

    /// A parameter has the wrong shape or type.
    #[error("Invalid value for {key}: expected {expected}")]
    InvalidValue { key: String, expected: String },

    /// A per-line or per-point list does not match the data length.
    #[error("Length mismatch for {key}: expected {expected}, found {found}")]
    LengthMismatch {
        key: String,
        expected: usize,
        found: usize,
    },

    /// The requested output format is not supported by any backend.
    #[error("File type not recognized: {0}")]
    UnsupportedFileType(String),

    /// The charting backend failed while drawing.
    #[error("Render error: {0}")]
    Render(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlotError {
    /// Create an InvalidValue error.
    pub fn invalid(key: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            expected: expected.into(),
        }
    }

    /// Create a MissingKey error.
    pub fn missing(key: impl Into<String>) -> Self {
        Self::MissingKey(key.into())
    }

    /// Create a LengthMismatch error.
    pub fn length_mismatch(key: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::LengthMismatch {
            key: key.into(),
            expected,
            found,
        }
    }

    /// Wrap any displayable backend error.
    pub fn render(err: impl std::fmt::Display) -> Self {
        Self::Render(err.to_string())
    }
}
