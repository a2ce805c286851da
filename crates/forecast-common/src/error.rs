//! Error types for forecast plotting configuration and metadata.

use thiserror::Error;

/// Result type alias using ForecastError.
pub type ForecastResult<T> = Result<T, ForecastError>;

/// Errors raised while resolving projections, times and configuration.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Unknown projection '{id}' (supported: {supported})")]
    UnknownProjection { id: String, supported: String },

    #[error("Invalid time specification: {0}")]
    InvalidTime(String),

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidConfig { key: String, message: String },

    #[error("Failed to read configuration: {0}")]
    ConfigRead(String),
}

impl ForecastError {
    pub fn invalid_config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        ForecastError::ConfigRead(err.to_string())
    }
}

impl From<serde_yaml::Error> for ForecastError {
    fn from(err: serde_yaml::Error) -> Self {
        ForecastError::ConfigRead(format!("YAML error: {}", err))
    }
}
