//! Common types shared by the wave forecast plotting crates.

pub mod config;
pub mod error;
pub mod projection;
pub mod time;

pub use config::{DataFormat, FigureConfig, PlotConfig, SaveOptions};
pub use error::{ForecastError, ForecastResult};
pub use projection::{Extent, MapKind, Projection, QuiverParams};
pub use time::ForecastTime;
