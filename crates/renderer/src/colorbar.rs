//! Horizontal colorbar drawn below the map.

use image::RgbaImage;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform};

use crate::contourf::LevelBands;
use crate::error::{RenderError, RenderResult};
use crate::figure::{pixmap_from_rgba, Artifact, ArtifactKind, ZOrder};
use crate::map::PlotRect;
use crate::text::{points_to_px, TextRenderer};

/// Length of each end triangle as a fraction of the interior length.
const EXTEND_FRAC: f32 = 0.05;
const FONT_SIZE: f32 = 10.0;

/// Tick label for a contour level: integers without a decimal point.
pub fn format_level(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Render a horizontal colorbar into `area`, with a tick and label at every
/// level and `label` centred underneath.
pub fn render_colorbar(
    bands: &LevelBands,
    area: &PlotRect,
    label: &str,
    dpi: u32,
    text: Option<&TextRenderer>,
) -> RenderResult<Artifact> {
    let size_px = points_to_px(FONT_SIZE, dpi);
    let margin = (size_px * 2.0).ceil();
    let tick_len = (area.height * 0.25).max(2.0);
    let gap = (size_px * 0.3).ceil();

    let bar_h = area.height.max(1.0);
    let width = (area.width + 2.0 * margin).ceil() as u32;
    let height = (bar_h + tick_len + 3.0 * gap + 2.0 * size_px).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;

    let extend = bands.extend();
    let n_ext = usize::from(extend.extends_min()) + usize::from(extend.extends_max());
    let interior = area.width / (1.0 + n_ext as f32 * EXTEND_FRAC);
    let tri = interior * EXTEND_FRAC;
    let left = margin;
    let right = margin + area.width;
    let x0 = if extend.extends_min() { left + tri } else { left };
    let x1 = x0 + interior;

    let levels = bands.levels();
    let (first, last) = (levels[0], levels[levels.len() - 1]);
    let pos = |v: f32| x0 + (v - first) / (last - first) * (x1 - x0);

    let mut paint = Paint::default();
    paint.anti_alias = false;
    for i in 0..bands.band_count() {
        let c = bands.band_color(i);
        paint.set_color_rgba8(c[0], c[1], c[2], c[3]);
        let (a, b) = (pos(levels[i]).floor(), pos(levels[i + 1]).ceil());
        if let Some(r) = Rect::from_ltrb(a, 0.0, b, bar_h) {
            pixmap.fill_rect(r, &paint, Transform::identity(), None);
        }
    }

    paint.anti_alias = true;
    if let Some(c) = bands.under_color() {
        paint.set_color_rgba8(c[0], c[1], c[2], c[3]);
        fill_triangle(&mut pixmap, &paint, (left, bar_h / 2.0), x0, bar_h);
    }
    if let Some(c) = bands.over_color() {
        paint.set_color_rgba8(c[0], c[1], c[2], c[3]);
        fill_triangle(&mut pixmap, &paint, (right, bar_h / 2.0), x1, bar_h);
    }

    // outline and ticks
    let mut pb = PathBuilder::new();
    pb.move_to(x0, 0.0);
    pb.line_to(x1, 0.0);
    if extend.extends_max() {
        pb.line_to(right, bar_h / 2.0);
    }
    pb.line_to(x1, bar_h);
    pb.line_to(x0, bar_h);
    if extend.extends_min() {
        pb.line_to(left, bar_h / 2.0);
    }
    pb.close();
    for &v in levels {
        let x = pos(v);
        pb.move_to(x, bar_h);
        pb.line_to(x, bar_h + tick_len);
    }
    if let Some(path) = pb.finish() {
        paint.set_color_rgba8(0, 0, 0, 255);
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    if let Some(renderer) = text {
        let mut labels = RgbaImage::new(width, height);
        let label_y = bar_h + tick_len + gap;
        for &v in levels {
            let s = format_level(v);
            let (w, _) = renderer.measure(&s, size_px);
            let x = pos(v) - w as f32 / 2.0;
            renderer.draw(&mut labels, &s, x.round() as i32, label_y.round() as i32, size_px, [0, 0, 0, 255]);
        }
        let (w, _) = renderer.measure(label, size_px);
        let x = margin + area.width / 2.0 - w as f32 / 2.0;
        let y = label_y + size_px + gap;
        renderer.draw(&mut labels, label, x.round() as i32, y.round() as i32, size_px, [0, 0, 0, 255]);

        let layer = pixmap_from_rgba(&labels)?;
        pixmap.draw_pixmap(0, 0, layer.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    }

    Ok(Artifact::placed(
        ArtifactKind::Colorbar,
        ZOrder::COLORBAR,
        (area.x - margin).round() as i32,
        area.y.round() as i32,
        pixmap,
    ))
}

fn fill_triangle(pixmap: &mut Pixmap, paint: &Paint, tip: (f32, f32), base_x: f32, bar_h: f32) {
    let mut pb = PathBuilder::new();
    pb.move_to(tip.0, tip.1);
    pb.line_to(base_x, 0.0);
    pb.line_to(base_x, bar_h);
    pb.close();
    if let Some(path) = pb.finish() {
        pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
    }
}
