//! Errors raised while producing map frames.

use forecast_common::ForecastError;
use forecast_data::DataError;
use renderer::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error(transparent)]
    Config(#[from] ForecastError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to start worker pool: {0}")]
    Pool(String),

    /// One or more chunks failed; the rest of the output is kept.
    #[error("{failed} of {total} chunks failed, first error: {first}")]
    Chunks {
        failed: usize,
        total: usize,
        first: Box<PlotError>,
    },
}

pub type PlotResult<T> = Result<T, PlotError>;
