//! Per-worker frame production.
//!
//! A [`WavePeriodPlotter`] owns one figure. The base map (land, axes frame)
//! is drawn once; every timestep adds its own layers, writes the frame and
//! removes those layers again. The colorbar is added with the first frame
//! and kept for the rest of the worker's frames.

use std::path::PathBuf;

use forecast_common::{PlotConfig, Projection};
use forecast_data::{Dataset, Timestep, PERIOD_FIELD, U_FIELD, V_FIELD};
use renderer::{
    add_logo_on_map, annotation, annotation_forecast, annotation_run, get_colormap,
    get_projection, levels_arange, render_colorbar, render_filled_contours, render_map_frame,
    render_nan_mask, render_quiver, truncate_colormap, Artifact, ArtifactKind, Extend, Figure,
    GridCoords, LevelBands, Loc, Logo, MapProjection, QuiverConfig, TextRenderer, ZOrder,
    LAND_COLOR, LOGO_POSITION, LOGO_ZOOM,
};
use tracing::debug;

use crate::error::PlotResult;
use crate::sink::FrameSink;

/// Name used for output files.
pub const VARIABLE_NAME: &str = "wave_period";
/// Source variables read from the archive.
pub const SOURCE_VARIABLES: [&str; 2] = ["TM10", "MWD"];

const COLORMAP: &str = "winds";
const COLORMAP_RANGE: (f32, f32) = (0.1, 1.0);
const COLORBAR_LABEL: &str = "Wave period [s]";
const TITLE: &str = "Wave period and direction";
const TITLE_FONT_SIZE: f32 = 6.0;

/// `<variable>_<cum_hour>.png`
pub fn output_filename(variable: &str, cum_hour: i64) -> String {
    format!("{}_{}.png", variable, cum_hour)
}

/// Everything a worker needs that does not change between frames.
#[derive(Debug)]
pub struct PlotContext {
    pub projection: Projection,
    pub config: PlotConfig,
    pub bands: LevelBands,
    pub quiver: QuiverConfig,
    pub text: Option<TextRenderer>,
    pub logo: Logo,
}

impl PlotContext {
    /// Period levels `2..=13` s on the truncated wind colormap, quiver
    /// settings for the projection, font and logo from the configuration.
    pub fn new(projection: Projection, config: PlotConfig) -> PlotResult<Self> {
        let cmap = truncate_colormap(&get_colormap(COLORMAP)?, COLORMAP_RANGE.0, COLORMAP_RANGE.1)?;
        let bands = LevelBands::new(levels_arange(2.0, 14.0, 1.0), &cmap, Extend::Both)?;
        let quiver = QuiverConfig::from_params(projection.quiver_params());
        let text = TextRenderer::load(config.font_path.as_deref())?;
        let logo = Logo::load(config.logo_path.as_deref())?;

        Ok(Self {
            projection,
            config,
            bands,
            quiver,
            text,
            logo,
        })
    }
}

/// Renders the timesteps of one dataset onto a reusable figure.
pub struct WavePeriodPlotter<'a> {
    ctx: &'a PlotContext,
    figure: Figure,
    map: MapProjection,
    coords: GridCoords,
    colorbar_added: bool,
}

impl<'a> WavePeriodPlotter<'a> {
    /// Set up the map for `dataset`'s grid and draw the base layers.
    ///
    /// Land is wherever the period is undefined in the first timestep.
    pub fn new(ctx: &'a PlotContext, dataset: &Dataset) -> PlotResult<Self> {
        let mut figure = Figure::from_config(&ctx.config.figure)?;
        let (width, height) = figure.size();
        let grid = dataset.grid();
        let (map, coords) = get_projection(grid.lons(), grid.lats(), ctx.projection, width, height)?;
        let rect = map.rect();

        let first = dataset.step(0)?;
        let land = render_nan_mask(first.field(PERIOD_FIELD)?, &coords, LAND_COLOR, &rect, width, height)?;
        figure.add_persistent(Artifact::full(ArtifactKind::Land, ZOrder::LAND, land));
        figure.add_persistent(Artifact::full(
            ArtifactKind::Frame,
            ZOrder::FRAME,
            render_map_frame(&rect, width, height)?,
        ));

        Ok(Self {
            ctx,
            figure,
            map,
            coords,
            colorbar_added: false,
        })
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    /// Draw, write and clear one frame.
    pub fn plot_step(&mut self, step: &Timestep<'_>, sink: &dyn FrameSink) -> PlotResult<PathBuf> {
        let ctx = self.ctx;
        let time = step.forecast_time();
        let cum_hour = time.cum_hour();
        let filename = output_filename(VARIABLE_NAME, cum_hour);
        let (width, height) = self.figure.size();
        let dpi = self.figure.dpi();
        let rect = self.map.rect();
        let text = ctx.text.as_ref();

        let contours = render_filled_contours(
            step.field(PERIOD_FIELD)?,
            &self.coords,
            &ctx.bands,
            &rect,
            width,
            height,
        )?;
        let arrows = render_quiver(
            step.field(U_FIELD)?,
            step.field(V_FIELD)?,
            &self.coords,
            &ctx.quiver,
            &rect,
            width,
            height,
        )?;

        let artifacts = [
            Artifact::full(ArtifactKind::Contour, ZOrder::CONTOUR, contours),
            annotation_forecast(&time).render(&rect, dpi, text)?,
            annotation(TITLE, Loc::LowerLeft, TITLE_FONT_SIZE).render(&rect, dpi, text)?,
            annotation_run(&time).render(&rect, dpi, text)?,
            Artifact::full(ArtifactKind::Quiver, ZOrder::QUIVER, arrows),
            add_logo_on_map(&ctx.logo, &rect, LOGO_ZOOM, LOGO_POSITION)?,
        ];
        let ids: Vec<_> = artifacts
            .into_iter()
            .map(|a| self.figure.add_artifact(a))
            .collect();

        if !self.colorbar_added {
            let colorbar =
                render_colorbar(&ctx.bands, &self.map.colorbar_rect(), COLORBAR_LABEL, dpi, text)?;
            self.figure.add_persistent(colorbar);
            self.colorbar_added = true;
        }

        let written = sink.write(&self.figure, &filename, &ctx.config.save);
        // clear even when writing failed so the figure stays reusable
        self.figure.remove_artifacts(&ids)?;
        let path = written?;

        debug!(
            projection = %ctx.projection,
            cum_hour,
            path = %path.display(),
            "Frame written"
        );
        Ok(path)
    }
}

/// Render every timestep of `dataset` on a fresh figure.
pub fn plot_files(dataset: &Dataset, ctx: &PlotContext, sink: &dyn FrameSink) -> PlotResult<Vec<PathBuf>> {
    if dataset.is_empty() {
        return Ok(Vec::new());
    }
    let mut plotter = WavePeriodPlotter::new(ctx, dataset)?;
    dataset
        .timesteps()
        .map(|step| plotter.plot_step(&step, sink))
        .collect()
}
