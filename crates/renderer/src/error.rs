//! Error types for map rendering.

use thiserror::Error;

/// Errors that can occur while building or writing a figure.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Colormap name not present in the catalog.
    #[error("unknown colormap '{name}' (available: {available})")]
    UnknownColormap { name: String, available: String },

    /// The embedded or supplied colormap catalog could not be parsed.
    #[error("invalid colormap catalog: {0}")]
    InvalidCatalog(String),

    /// A colour string that is not `#rrggbb`.
    #[error("invalid colour '{0}'")]
    InvalidColor(String),

    /// Truncation bounds outside `0 <= low < high <= 1`.
    #[error("invalid colormap range {low}..{high}")]
    InvalidRange { low: f32, high: f32 },

    /// Contour levels that are empty or not increasing.
    #[error("invalid contour levels: {0}")]
    InvalidLevels(String),

    /// A pixmap or image of zero or oversized dimensions.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Grid values do not match the grid coordinates.
    #[error("grid shape mismatch: expected {expected} values, got {actual}")]
    GridMismatch { expected: usize, actual: usize },

    /// The figure has no artifact with this id.
    #[error("no artifact with id {0}")]
    UnknownArtifact(u64),

    /// Configured font could not be read or parsed.
    #[error("failed to load font {path}: {message}")]
    Font { path: String, message: String },

    /// Logo image could not be loaded.
    #[error("failed to load logo {path}: {message}")]
    Logo { path: String, message: String },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidCatalog(err.to_string())
    }
}

/// Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
