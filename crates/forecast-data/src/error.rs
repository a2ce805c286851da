//! Error types for dataset loading and manipulation.

use forecast_common::ForecastError;
use thiserror::Error;

/// Errors that can occur while loading or transforming datasets.
#[derive(Error, Debug)]
pub enum DataError {
    /// Failed to open the data source.
    #[error("failed to open dataset: {0}")]
    OpenFailed(String),

    /// Failed to read values from the data source.
    #[error("failed to read dataset values: {0}")]
    ReadFailed(String),

    /// A requested variable is not present.
    #[error("variable not found: {0}")]
    MissingVariable(String),

    /// A field does not match the dataset's time/grid shape.
    #[error("shape mismatch for '{name}': expected {expected}, got {actual}")]
    ShapeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// Invalid or missing metadata in the source.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// The requested valid time is not on the time axis.
    #[error("time not found on the time axis: {0}")]
    TimeNotFound(String),

    /// A time index range falls outside the time axis.
    #[error("time range {start}..{end} outside axis of length {len}")]
    IndexOutOfRange { start: usize, end: usize, len: usize },

    /// The projection extent does not overlap the data grid.
    #[error("no grid points inside extent: {0}")]
    EmptySelection(String),

    /// Values that cannot be processed (e.g. infinite directions).
    #[error("invalid data in '{name}': {message}")]
    InvalidData { name: String, message: String },

    /// Chunk size of zero.
    #[error("chunk size must be at least 1")]
    InvalidChunkSize,

    /// Zarr format error.
    #[error("Zarr format error: {0}")]
    Zarr(String),

    /// NetCDF format error.
    #[error("NetCDF error: {0}")]
    NetCdf(String),

    /// The requested storage layout is not compiled in.
    #[error("unsupported data format: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

impl DataError {
    pub fn shape_mismatch(
        name: impl Into<String>,
        expected: impl std::fmt::Debug,
        actual: impl std::fmt::Debug,
    ) -> Self {
        Self::ShapeMismatch {
            name: name.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }

    pub fn invalid_data(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidData {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        Self::OpenFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidMetadata(err.to_string())
    }
}

/// Result type for dataset operations.
pub type DataResult<T> = std::result::Result<T, DataError>;
