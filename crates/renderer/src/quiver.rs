//! Decimated arrow (quiver) overlays.
//!
//! Arrows start at their grid point and point along `(u, v)` on screen.
//! Their length is `magnitude / scale` axes widths, so a constant magnitude
//! gives arrows of constant length that only encode direction.

use forecast_common::QuiverParams;
use tiny_skia::{FillRule, Mask, Paint, PathBuilder, Pixmap, Rect, Transform};

use crate::error::{RenderError, RenderResult};
use crate::map::{GridCoords, PlotRect};

/// Quiver styling and decimation.
#[derive(Debug, Clone, PartialEq)]
pub struct QuiverConfig {
    /// Keep every `density`-th grid point along both axes.
    pub density: usize,
    /// Data units per axes width.
    pub scale: f32,
    pub color: [u8; 3],
    pub alpha: f32,
    /// Shaft width as a fraction of the plot width.
    pub shaft_width: f32,
    /// Head width, in shaft widths.
    pub head_width: f32,
    /// Head length, in shaft widths.
    pub head_length: f32,
    /// Head length at the shaft, in shaft widths.
    pub head_axis_length: f32,
}

impl QuiverConfig {
    /// Gray, half-transparent arrows with the given decimation and scale.
    pub fn from_params(params: QuiverParams) -> Self {
        Self {
            density: params.density,
            scale: params.scale,
            ..Default::default()
        }
    }
}

impl Default for QuiverConfig {
    fn default() -> Self {
        Self {
            density: 1,
            scale: 1.0,
            color: [128, 128, 128],
            alpha: 0.5,
            shaft_width: 0.005,
            head_width: 3.0,
            head_length: 5.0,
            head_axis_length: 4.5,
        }
    }
}

/// Indices kept when decimating an axis of length `n`: `0, d, 2d, ...`.
pub fn quiver_positions(n: usize, density: usize) -> Vec<usize> {
    (0..n).step_by(density.max(1)).collect()
}

/// Arrow length in pixels for a vector on a plot `plot_width` pixels wide.
pub fn arrow_length(u: f32, v: f32, scale: f32, plot_width: f32) -> f32 {
    u.hypot(v) / scale * plot_width
}

/// Arrow outline along +x, tail at the origin.
///
/// Arrows shorter than their head are shrunk as a whole so the head keeps
/// its shape.
fn arrow_outline(length: f32, shaft: f32, config: &QuiverConfig) -> [(f32, f32); 7] {
    let mut head_len = config.head_length * shaft;
    let mut head_axis = config.head_axis_length * shaft;
    let mut half_head = config.head_width * shaft / 2.0;
    let mut half_shaft = shaft / 2.0;

    if length < head_len {
        let shrink = length / head_len;
        head_len *= shrink;
        head_axis *= shrink;
        half_head *= shrink;
        half_shaft *= shrink;
    }

    [
        (0.0, -half_shaft),
        (length - head_axis, -half_shaft),
        (length - head_len, -half_head),
        (length, 0.0),
        (length - head_len, half_head),
        (length - head_axis, half_shaft),
        (0.0, half_shaft),
    ]
}

/// Coverage mask of the map area; arrows are clipped to it.
fn plot_area_mask(rect: &PlotRect, width: u32, height: u32) -> Option<Mask> {
    let r = Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)?;
    let mut mask = Mask::new(width, height)?;
    mask.fill_path(&PathBuilder::from_rect(r), FillRule::Winding, false, Transform::identity());
    Some(mask)
}

/// Draw decimated `(u, v)` arrows into a transparent layer.
///
/// Points with a NaN or zero component vector are skipped. Arrow parts
/// outside `rect` are not drawn.
pub fn render_quiver(
    u: &[f32],
    v: &[f32],
    coords: &GridCoords,
    config: &QuiverConfig,
    rect: &PlotRect,
    width: u32,
    height: u32,
) -> RenderResult<Pixmap> {
    coords.check(u)?;
    coords.check(v)?;
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;

    let mut paint = Paint::default();
    let alpha = (config.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    paint.set_color_rgba8(config.color[0], config.color[1], config.color[2], alpha);
    paint.anti_alias = true;

    let shaft = config.shaft_width * rect.width;
    let nx = coords.nx();
    let mut pb = PathBuilder::new();
    let mut drawn = 0usize;

    for row in quiver_positions(coords.ny(), config.density) {
        for col in quiver_positions(nx, config.density) {
            let (du, dv) = (u[row * nx + col], v[row * nx + col]);
            if du.is_nan() || dv.is_nan() {
                continue;
            }
            let length = arrow_length(du, dv, config.scale, rect.width);
            if length <= 0.0 {
                continue;
            }

            // screen y grows downwards
            let angle = (-dv).atan2(du);
            let (sin, cos) = angle.sin_cos();
            let (x, y) = (coords.xs[col], coords.ys[row]);

            let outline = arrow_outline(length, shaft, config);
            for (i, &(ax, ay)) in outline.iter().enumerate() {
                let px = x + ax * cos - ay * sin;
                let py = y + ax * sin + ay * cos;
                if i == 0 {
                    pb.move_to(px, py);
                } else {
                    pb.line_to(px, py);
                }
            }
            pb.close();
            drawn += 1;
        }
    }

    // one path for all arrows; overlaps do not darken each other
    if let (Some(path), Some(mask)) = (pb.finish(), plot_area_mask(rect, width, height)) {
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), Some(&mask));
    }

    tracing::trace!(arrows = drawn, density = config.density, "Quiver drawn");
    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_start_at_zero() {
        assert_eq!(quiver_positions(10, 3), vec![0, 3, 6, 9]);
        assert_eq!(quiver_positions(10, 10), vec![0]);
        assert_eq!(quiver_positions(4, 1), vec![0, 1, 2, 3]);
        assert!(quiver_positions(0, 5).is_empty());
    }

    #[test]
    fn test_arrow_length_scales_with_width() {
        assert!((arrow_length(0.0, -10.0, 600.0, 600.0) - 10.0).abs() < 1e-4);
        assert!((arrow_length(6.0, 8.0, 500.0, 1000.0) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_arrow_tip_at_length() {
        let config = QuiverConfig::default();
        let outline = arrow_outline(40.0, 4.0, &config);
        assert_eq!(outline[3], (40.0, 0.0));
        assert_eq!(outline[0].0, 0.0);
    }

    #[test]
    fn test_short_arrow_head_shrinks() {
        let config = QuiverConfig::default();
        // head length is 5 shafts = 20 px, arrow only 10 px
        let outline = arrow_outline(10.0, 4.0, &config);
        assert_eq!(outline[2].0, 0.0);
        assert!(outline.iter().all(|&(x, _)| (0.0..=10.0).contains(&x)));
    }

    #[test]
    fn test_arrows_clipped_to_plot_area() {
        let coords = GridCoords {
            xs: vec![10.0, 90.0],
            ys: vec![50.0],
        };
        let rect = PlotRect {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        };
        let config = QuiverConfig {
            scale: 200.0,
            alpha: 1.0,
            shaft_width: 0.04,
            ..Default::default()
        };
        // eastward arrow of 25 px from x = 90, crossing the right edge
        let u = [0.0, 50.0];
        let v = [0.0, 0.0];
        let pixmap = render_quiver(&u, &v, &coords, &config, &rect, 120, 120).unwrap();

        assert!(pixmap.pixel(95, 50).unwrap().alpha() > 0);
        for x in 100..120 {
            for y in 40..60 {
                assert_eq!(pixmap.pixel(x, y).unwrap().alpha(), 0, "pixel ({}, {})", x, y);
            }
        }
    }
}
