//! Map axes: projection of geographic coordinates into figure pixels.
//!
//! Both supported map kinds are separable: the pixel column depends only on
//! longitude and the pixel row only on latitude. A grid therefore projects
//! to one x coordinate per column and one y coordinate per row
//! ([`GridCoords`]), which is what the contour and quiver layers consume.

use std::f64::consts::FRAC_PI_4;

use forecast_common::{Extent, MapKind, Projection};

use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::error::{RenderError, RenderResult};

/// Axes box in figure-fraction units, matching the usual single-subplot layout.
const AXES_LEFT: f64 = 0.125;
const AXES_RIGHT: f64 = 0.9;
const AXES_TOP: f64 = 0.12;
const AXES_BOTTOM: f64 = 0.89;

/// Space kept free below the map for a horizontal colorbar, as fractions of
/// the figure height.
pub const COLORBAR_PAD: f64 = 0.03;
pub const COLORBAR_FRACTION: f64 = 0.03;

/// Light gray used for continents.
pub const LAND_COLOR: [u8; 4] = [211, 211, 211, 255];

/// A rectangle in figure pixels (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PlotRect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Pixel position of an axes-fraction point (`(0, 0)` is lower left).
    pub fn at_fraction(&self, fx: f32, fy: f32) -> (f32, f32) {
        (self.x + fx * self.width, self.bottom() - fy * self.height)
    }
}

/// Map axes placed on a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct MapProjection {
    extent: Extent,
    kind: MapKind,
    rect: PlotRect,
    figure_size: (u32, u32),
}

impl MapProjection {
    /// Fit the extent into the axes box of a `width x height` figure,
    /// keeping equal aspect in projected units.
    pub fn new(extent: Extent, kind: MapKind, width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }

        let (w, h) = (width as f64, height as f64);
        let box_x = AXES_LEFT * w;
        let box_y = AXES_TOP * h;
        let box_w = (AXES_RIGHT - AXES_LEFT) * w;
        let box_h = (AXES_BOTTOM - AXES_TOP - COLORBAR_PAD - COLORBAR_FRACTION) * h;

        let proj_w = project_lon(kind, extent.max_lon) - project_lon(kind, extent.min_lon);
        let proj_h = project_lat(kind, extent.max_lat) - project_lat(kind, extent.min_lat);
        if proj_w <= 0.0 || proj_h <= 0.0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }

        // shrink one side so that one projected unit is square
        let scale = (box_w / proj_w).min(box_h / proj_h);
        let map_w = proj_w * scale;
        let map_h = proj_h * scale;

        let rect = PlotRect {
            x: (box_x + (box_w - map_w) / 2.0) as f32,
            y: (box_y + (box_h - map_h) / 2.0) as f32,
            width: map_w as f32,
            height: map_h as f32,
        };

        Ok(Self {
            extent,
            kind,
            rect,
            figure_size: (width, height),
        })
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    pub fn kind(&self) -> MapKind {
        self.kind
    }

    /// Map area in figure pixels.
    pub fn rect(&self) -> PlotRect {
        self.rect
    }

    pub fn figure_size(&self) -> (u32, u32) {
        self.figure_size
    }

    /// Strip reserved below the map for a horizontal colorbar.
    pub fn colorbar_rect(&self) -> PlotRect {
        let h = self.figure_size.1 as f32;
        PlotRect {
            x: self.rect.x,
            y: self.rect.bottom() + COLORBAR_PAD as f32 * h,
            width: self.rect.width,
            height: COLORBAR_FRACTION as f32 * h,
        }
    }

    /// Pixel x of a longitude.
    pub fn x(&self, lon: f64) -> f32 {
        let p0 = project_lon(self.kind, self.extent.min_lon);
        let p1 = project_lon(self.kind, self.extent.max_lon);
        let t = (project_lon(self.kind, lon) - p0) / (p1 - p0);
        self.rect.x + (t as f32) * self.rect.width
    }

    /// Pixel y of a latitude (north is up).
    pub fn y(&self, lat: f64) -> f32 {
        let p0 = project_lat(self.kind, self.extent.min_lat);
        let p1 = project_lat(self.kind, self.extent.max_lat);
        let t = (project_lat(self.kind, lat) - p0) / (p1 - p0);
        self.rect.bottom() - (t as f32) * self.rect.height
    }

    /// Pixel coordinates of every column and row of a lat/lon grid.
    pub fn grid_coords(&self, lons: &[f64], lats: &[f64]) -> GridCoords {
        GridCoords {
            xs: lons.iter().map(|&lon| self.x(lon)).collect(),
            ys: lats.iter().map(|&lat| self.y(lat)).collect(),
        }
    }
}

fn project_lon(_kind: MapKind, lon: f64) -> f64 {
    lon.to_radians()
}

fn project_lat(kind: MapKind, lat: f64) -> f64 {
    match kind {
        MapKind::Cylindrical => lat.to_radians(),
        MapKind::Mercator => (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln(),
    }
}

/// Set up the map axes for a projection on a `width x height` figure and
/// project the grid axes.
///
/// `lons` must increase and `lats` must decrease (north first), so the
/// returned pixel coordinates increase along both axes.
pub fn get_projection(
    lons: &[f64],
    lats: &[f64],
    projection: Projection,
    width: u32,
    height: u32,
) -> RenderResult<(MapProjection, GridCoords)> {
    let map = MapProjection::new(projection.extent(), projection.map_kind(), width, height)?;
    let coords = map.grid_coords(lons, lats);
    tracing::debug!(
        projection = %projection,
        rect = ?map.rect(),
        nx = coords.nx(),
        ny = coords.ny(),
        "Map axes ready"
    );
    Ok((map, coords))
}

/// Black outline around the map area.
pub fn render_map_frame(rect: &PlotRect, width: u32, height: u32) -> RenderResult<Pixmap> {
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;
    let Some(r) = Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) else {
        return Ok(pixmap);
    };
    let path = PathBuilder::from_rect(r);
    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    let stroke = Stroke {
        width: 1.0,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    Ok(pixmap)
}

/// Projected pixel coordinates of a grid's columns and rows.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCoords {
    /// Pixel x of each column, increasing.
    pub xs: Vec<f32>,
    /// Pixel y of each row, increasing (rows run north to south).
    pub ys: Vec<f32>,
}

impl GridCoords {
    pub fn nx(&self) -> usize {
        self.xs.len()
    }

    pub fn ny(&self) -> usize {
        self.ys.len()
    }

    /// Values per 2-D slice.
    pub fn len(&self) -> usize {
        self.xs.len() * self.ys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that a 2-D slice matches the grid.
    pub fn check(&self, values: &[f32]) -> RenderResult<()> {
        if values.len() != self.len() {
            return Err(RenderError::GridMismatch {
                expected: self.len(),
                actual: values.len(),
            });
        }
        Ok(())
    }
}

/// Cell index and offset of a pixel coordinate along a projected axis.
///
/// Returns `(i, t)` with `axis[i] <= p <= axis[i + 1]` and `t` in `[0, 1]`,
/// or `None` if `p` lies outside the axis.
pub fn fractional_index(axis: &[f32], p: f32) -> Option<(usize, f32)> {
    if axis.len() < 2 || p < axis[0] || p > axis[axis.len() - 1] {
        return None;
    }
    let upper = axis.partition_point(|&v| v <= p);
    let i = upper.saturating_sub(1).min(axis.len() - 2);
    let span = axis[i + 1] - axis[i];
    let t = if span > 0.0 { (p - axis[i]) / span } else { 0.0 };
    Some((i, t.clamp(0.0, 1.0)))
}

/// Lookup table of [`fractional_index`] for every pixel centre in `start..end`.
pub(crate) fn pixel_lookup(axis: &[f32], start: usize, end: usize) -> Vec<Option<(usize, f32)>> {
    (start..end)
        .map(|p| fractional_index(axis, p as f32 + 0.5))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractional_index_inside() {
        let axis = [0.0, 10.0, 20.0];
        assert_eq!(fractional_index(&axis, 0.0), Some((0, 0.0)));
        assert_eq!(fractional_index(&axis, 5.0), Some((0, 0.5)));
        assert_eq!(fractional_index(&axis, 15.0), Some((1, 0.5)));
        assert_eq!(fractional_index(&axis, 20.0), Some((1, 1.0)));
    }

    #[test]
    fn test_fractional_index_outside() {
        let axis = [0.0, 10.0];
        assert_eq!(fractional_index(&axis, -0.1), None);
        assert_eq!(fractional_index(&axis, 10.1), None);
        assert_eq!(fractional_index(&[3.0], 3.0), None);
    }

    #[test]
    fn test_extent_corners_map_to_rect() {
        let extent = Extent::new(12.0, 40.0, 20.0, 46.0);
        let map = MapProjection::new(extent, MapKind::Cylindrical, 1100, 900).unwrap();
        let rect = map.rect();
        assert!((map.x(12.0) - rect.x).abs() < 1e-3);
        assert!((map.x(20.0) - rect.right()).abs() < 1e-3);
        assert!((map.y(46.0) - rect.y).abs() < 1e-3);
        assert!((map.y(40.0) - rect.bottom()).abs() < 1e-3);
    }

    #[test]
    fn test_cylindrical_aspect_is_equal() {
        let extent = Extent::new(12.0, 40.0, 20.0, 46.0);
        let map = MapProjection::new(extent, MapKind::Cylindrical, 1100, 900).unwrap();
        let rect = map.rect();
        let px_per_deg_x = rect.width / 8.0;
        let px_per_deg_y = rect.height / 6.0;
        assert!((px_per_deg_x - px_per_deg_y).abs() < 1e-3);
    }

    #[test]
    fn test_mercator_stretches_north() {
        let extent = Extent::new(-23.5, 29.5, 45.0, 70.5);
        let map = MapProjection::new(extent, MapKind::Mercator, 1100, 900).unwrap();
        // a degree of latitude is taller near 70N than near 30N
        let south = map.y(30.0) - map.y(31.0);
        let north = map.y(69.0) - map.y(70.0);
        assert!(north > south * 2.0);
    }

    #[test]
    fn test_map_leaves_room_for_colorbar() {
        let map = MapProjection::new(
            Projection::DEFAULT.extent(),
            MapKind::Mercator,
            1100,
            900,
        )
        .unwrap();
        let reserved = ((COLORBAR_PAD + COLORBAR_FRACTION) * 900.0) as f32;
        assert!(map.rect().bottom() <= (AXES_BOTTOM * 900.0) as f32 - reserved + 1e-3);
    }
}
