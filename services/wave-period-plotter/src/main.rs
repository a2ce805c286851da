//! Wave period map plotter.
//!
//! Renders one PNG per forecast step for a map projection, splitting the
//! steps over a pool of workers.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use forecast_common::time::format_elapsed;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use wave_period_plotter::cli::{log_level, Args};
use wave_period_plotter::{run, PreviewSink, RunMode, VARIABLE_NAME};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(&args.log_level))
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let start = Instant::now();
    info!("Starting script to plot {}", VARIABLE_NAME);

    let projection = args.projection()?;
    let config = args.plot_config().context("invalid configuration")?;
    info!(
        projection = %projection,
        data_dir = %config.data_dir.display(),
        images_root = %config.images_root.display(),
        processes = config.processes,
        chunk_size = config.chunk_size,
        "Configuration loaded"
    );

    let mode = if args.debug {
        RunMode::Debug {
            preview_dir: std::env::temp_dir().join(PreviewSink::DEFAULT_DIR_NAME),
        }
    } else {
        RunMode::Parallel
    };

    let written = run(projection, config, mode)
        .with_context(|| format!("plotting {} for {} failed", VARIABLE_NAME, projection))?;
    info!(frames = written.len(), "All frames written");

    info!("script took {}", format_elapsed(start.elapsed()));
    Ok(())
}
