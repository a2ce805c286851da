//! Wave period and direction map production.
//!
//! Loads mean period (`TM10`) and mean direction (`MWD`) for one map
//! projection, derives constant-length direction vectors, and renders one
//! PNG per forecast step to `<images_root>/<projection>/wave_period_<h>.png`.
//! Steps are split into chunks and rendered on a worker pool; debug mode
//! renders the first two steps serially into a preview folder.

pub mod cli;
pub mod dispatch;
pub mod error;
pub mod plot;
pub mod sink;

use std::path::PathBuf;
use std::sync::Arc;

use forecast_common::{DataFormat, PlotConfig, Projection};
use forecast_data::{prepare_direction_vectors, Dataset, DatasetLoader, ZarrLoader};
use tracing::info;

pub use error::{PlotError, PlotResult};
pub use plot::{output_filename, plot_files, PlotContext, WavePeriodPlotter, SOURCE_VARIABLES, VARIABLE_NAME};
pub use sink::{DiskSink, FrameSink, PreviewSink};

/// How frames are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Chunked rendering on the worker pool into the projection folder.
    Parallel,
    /// First steps only, serially, into the given preview folder.
    Debug { preview_dir: PathBuf },
}

/// Read the source variables for `projection` with the configured loader.
pub fn load_dataset(config: &PlotConfig, projection: Projection) -> PlotResult<Dataset> {
    let dataset = match config.data_format {
        DataFormat::Zarr => ZarrLoader::new(&config.data_dir).load(&SOURCE_VARIABLES, projection)?,
        DataFormat::Netcdf => load_netcdf(config, projection)?,
    };
    Ok(dataset)
}

#[cfg(feature = "netcdf")]
fn load_netcdf(config: &PlotConfig, projection: Projection) -> PlotResult<Dataset> {
    Ok(forecast_data::NetCdfLoader::new(&config.data_dir).load(&SOURCE_VARIABLES, projection)?)
}

#[cfg(not(feature = "netcdf"))]
fn load_netcdf(_config: &PlotConfig, _projection: Projection) -> PlotResult<Dataset> {
    Err(forecast_data::DataError::Unsupported("netcdf (build with the `netcdf` feature)".to_string()).into())
}

/// Load, prepare and render every frame for one projection.
pub fn run(projection: Projection, config: PlotConfig, mode: RunMode) -> PlotResult<Vec<PathBuf>> {
    config.validate()?;

    let mut dataset = load_dataset(&config, projection)?;
    prepare_direction_vectors(&mut dataset, config.speed)?;
    let ctx = PlotContext::new(projection, config)?;

    info!(
        projection = %projection,
        timesteps = dataset.len(),
        "Pre-processing finished, launching plotting scripts"
    );

    match mode {
        RunMode::Parallel => {
            let sink = DiskSink::new(ctx.config.subfolder_images(projection))?;
            dispatch::run_parallel(&dataset, Arc::new(ctx), Arc::new(sink))
        }
        RunMode::Debug { preview_dir } => {
            let sink = PreviewSink::new(preview_dir)?;
            dispatch::run_debug(&dataset, &ctx, &sink)
        }
    }
}
