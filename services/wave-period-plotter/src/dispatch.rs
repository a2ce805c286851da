//! Fan-out of dataset chunks over a worker pool.

use std::path::PathBuf;
use std::sync::Arc;

use forecast_data::{chunks_dataset, Dataset};
use rayon::prelude::*;
use tracing::{error, info};

use crate::error::{PlotError, PlotResult};
use crate::plot::{plot_files, PlotContext};
use crate::sink::FrameSink;

/// Timesteps rendered in debug mode.
pub const DEBUG_STEPS: usize = 2;

/// Split `dataset` into chunks of `chunk_size` timesteps and render them on
/// a pool of `processes` threads, one figure per chunk.
///
/// Every chunk runs to completion. If any failed, the first failure is
/// returned after the pool has joined; frames from other chunks stay on
/// disk.
pub fn run_parallel(
    dataset: &Dataset,
    ctx: Arc<PlotContext>,
    sink: Arc<dyn FrameSink>,
) -> PlotResult<Vec<PathBuf>> {
    let chunks = chunks_dataset(dataset, ctx.config.chunk_size)?;
    let total = chunks.len();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(ctx.config.processes)
        .thread_name(|i| format!("plot-worker-{}", i))
        .build()
        .map_err(|e| PlotError::Pool(e.to_string()))?;

    info!(
        chunks = total,
        processes = ctx.config.processes,
        chunk_size = ctx.config.chunk_size,
        "Dispatching chunks"
    );

    let results: Vec<PlotResult<Vec<PathBuf>>> = pool.install(|| {
        chunks
            .into_par_iter()
            .enumerate()
            .map(|(index, chunk)| {
                let result = plot_files(&chunk, &ctx, sink.as_ref());
                match &result {
                    Ok(paths) => info!(chunk = index, frames = paths.len(), "Chunk finished"),
                    Err(e) => error!(chunk = index, error = %e, "Chunk failed"),
                }
                result
            })
            .collect()
    });

    let mut written = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(paths) => written.extend(paths),
            Err(e) => failures.push(e),
        }
    }

    let failed = failures.len();
    match failures.into_iter().next() {
        None => Ok(written),
        Some(first) => Err(PlotError::Chunks {
            failed,
            total,
            first: Box::new(first),
        }),
    }
}

/// Render the first [`DEBUG_STEPS`] timesteps serially.
pub fn run_debug(dataset: &Dataset, ctx: &PlotContext, sink: &dyn FrameSink) -> PlotResult<Vec<PathBuf>> {
    let end = dataset.len().min(DEBUG_STEPS);
    let preview = dataset.isel(0..end)?;
    info!(steps = end, dir = %sink.dir().display(), "Debug mode, rendering preview frames");
    plot_files(&preview, ctx, sink)
}
