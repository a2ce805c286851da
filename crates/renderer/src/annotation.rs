//! Boxed text labels anchored inside the map axes.

use forecast_common::ForecastTime;
use image::{Rgba, RgbaImage};

use crate::error::RenderResult;
use crate::figure::{pixmap_from_rgba, Artifact, ArtifactKind, ZOrder};
use crate::map::PlotRect;
use crate::text::{points_to_px, TextRenderer};

/// Default label size in points.
pub const DEFAULT_FONT_SIZE: f32 = 9.0;

/// Corner of the axes a label is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loc {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

/// A text label in a semi-transparent white box.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub loc: Loc,
    /// Font size in points.
    pub font_size: f32,
}

/// Free text label.
pub fn annotation(text: impl Into<String>, loc: Loc, font_size: f32) -> Annotation {
    Annotation {
        text: text.into(),
        loc,
        font_size,
    }
}

/// `Valid <weekday> <dd> <Mon> <yyyy> at <HH> UTC` in the upper left corner.
pub fn annotation_forecast(time: &ForecastTime) -> Annotation {
    annotation(time.valid_label(), Loc::UpperLeft, DEFAULT_FONT_SIZE)
}

/// `Run <yyyymmdd> <HH> UTC` in the upper right corner.
pub fn annotation_run(time: &ForecastTime) -> Annotation {
    annotation(time.run_label(), Loc::UpperRight, DEFAULT_FONT_SIZE)
}

impl Annotation {
    /// Rasterize the label and place it inside `rect`.
    ///
    /// Without a font only the box is drawn, sized from an estimate of the
    /// text width.
    pub fn render(
        &self,
        rect: &PlotRect,
        dpi: u32,
        text: Option<&TextRenderer>,
    ) -> RenderResult<Artifact> {
        let size_px = points_to_px(self.font_size, dpi);
        let pad = (size_px * 0.4).round().max(1.0) as u32;
        let border = (size_px * 0.25).round() as f32;

        let (text_w, text_h) = match text {
            Some(renderer) => renderer.measure(&self.text, size_px),
            None => (
                (self.text.chars().count() as f32 * size_px * 0.55) as u32,
                size_px as u32,
            ),
        };
        let box_w = text_w + 2 * pad;
        let box_h = text_h.max(size_px as u32) + 2 * pad;

        let mut img = RgbaImage::from_pixel(box_w, box_h, Rgba([255, 255, 255, 200]));
        draw_outline(&mut img, [0, 0, 0, 255]);
        if let Some(renderer) = text {
            renderer.draw(&mut img, &self.text, pad as i32, pad as i32, size_px, [0, 0, 0, 255]);
        }

        let (x, y) = match self.loc {
            Loc::UpperLeft => (rect.x + border, rect.y + border),
            Loc::UpperRight => (rect.right() - border - box_w as f32, rect.y + border),
            Loc::LowerLeft => (rect.x + border, rect.bottom() - border - box_h as f32),
            Loc::LowerRight => (
                rect.right() - border - box_w as f32,
                rect.bottom() - border - box_h as f32,
            ),
        };

        Ok(Artifact::placed(
            ArtifactKind::Annotation,
            ZOrder::ANNOTATION,
            x.round() as i32,
            y.round() as i32,
            pixmap_from_rgba(&img)?,
        ))
    }
}

fn draw_outline(img: &mut RgbaImage, color: [u8; 4]) {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return;
    }
    for x in 0..w {
        img.put_pixel(x, 0, Rgba(color));
        img.put_pixel(x, h - 1, Rgba(color));
    }
    for y in 0..h {
        img.put_pixel(0, y, Rgba(color));
        img.put_pixel(w - 1, y, Rgba(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn rect() -> PlotRect {
        PlotRect {
            x: 100.0,
            y: 50.0,
            width: 800.0,
            height: 600.0,
        }
    }

    #[test]
    fn test_forecast_and_run_labels() {
        let run = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let time = ForecastTime::from_offset(run, 27);
        let forecast = annotation_forecast(&time);
        assert_eq!(forecast.text, "Valid Tuesday 16 Jan 2024 at 03 UTC");
        assert_eq!(forecast.loc, Loc::UpperLeft);
        let run_label = annotation_run(&time);
        assert_eq!(run_label.text, "Run 20240115 00 UTC");
        assert_eq!(run_label.loc, Loc::UpperRight);
    }

    #[test]
    fn test_boxes_stay_inside_axes_without_font() {
        let rect = rect();
        for loc in [Loc::UpperLeft, Loc::UpperRight, Loc::LowerLeft, Loc::LowerRight] {
            let artifact = annotation("Wave period and direction", loc, 6.0)
                .render(&rect, 100, None)
                .unwrap();
            let (x, y) = artifact.offset();
            let (w, h) = artifact.size();
            assert!(x as f32 >= rect.x && (x + w as i32) as f32 <= rect.right() + 1.0);
            assert!(y as f32 >= rect.y && (y + h as i32) as f32 <= rect.bottom() + 1.0);
        }
    }
}
