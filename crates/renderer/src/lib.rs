//! Raster map rendering for forecast fields.
//!
//! A map frame is built on a [`figure::Figure`] from layers:
//! - filled contours with extended colour bands ([`contourf`])
//! - decimated direction arrows ([`quiver`])
//! - boxed text labels and a logo ([`annotation`], [`logo`])
//! - a horizontal colorbar ([`colorbar`])
//!
//! Frames are encoded with the built-in PNG writer ([`png`]).

pub mod annotation;
pub mod colorbar;
pub mod colormap;
pub mod contourf;
pub mod error;
pub mod figure;
pub mod logo;
pub mod map;
pub mod png;
pub mod quiver;
pub mod text;

pub use annotation::{annotation, annotation_forecast, annotation_run, Annotation, Loc};
pub use colorbar::render_colorbar;
pub use colormap::{get_colormap, truncate_colormap, Colormap};
pub use contourf::{levels_arange, render_filled_contours, render_nan_mask, Extend, LevelBands};
pub use error::{RenderError, RenderResult};
pub use figure::{Artifact, ArtifactId, ArtifactKind, Figure, ZOrder};
pub use logo::{add_logo_on_map, Logo, LOGO_POSITION, LOGO_ZOOM};
pub use map::{get_projection, render_map_frame, GridCoords, MapProjection, PlotRect, LAND_COLOR};
pub use quiver::{render_quiver, QuiverConfig};
pub use text::TextRenderer;
