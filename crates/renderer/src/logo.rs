//! Logo overlay placed at a fixed axes position.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbaImage;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::error::{RenderError, RenderResult};
use crate::figure::{pixmap_from_rgba, Artifact, ArtifactKind, ZOrder};
use crate::map::PlotRect;

/// Zoom applied to the logo image.
pub const LOGO_ZOOM: f32 = 0.1;
/// Axes-fraction position of the logo centre.
pub const LOGO_POSITION: (f32, f32) = (0.95, 0.08);

/// Edge of the drawn mark, in pixels, at zoom 1.
const MARK_SIZE: f32 = 480.0;

/// Source of the logo artwork.
#[derive(Debug, Clone)]
pub enum Logo {
    /// Raster logo read from disk.
    Image { source: PathBuf, image: RgbaImage },
    /// Drawn mark used when no logo file is configured.
    Mark,
}

impl Logo {
    /// Load the logo file, or fall back to the drawn mark when no path is set.
    pub fn load(path: Option<&Path>) -> RenderResult<Self> {
        let Some(path) = path else {
            return Ok(Logo::Mark);
        };
        let image = image::open(path)
            .map_err(|e| RenderError::Logo {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
            .to_rgba8();
        Ok(Logo::Image {
            source: path.to_path_buf(),
            image,
        })
    }

    fn raster(&self, zoom: f32) -> RenderResult<Pixmap> {
        match self {
            Logo::Image { image, .. } => {
                let w = ((image.width() as f32 * zoom).round() as u32).max(1);
                let h = ((image.height() as f32 * zoom).round() as u32).max(1);
                let scaled = imageops::resize(image, w, h, FilterType::Triangle);
                pixmap_from_rgba(&scaled)
            }
            Logo::Mark => draw_mark((MARK_SIZE * zoom).round().max(8.0) as u32),
        }
    }
}

/// Place the logo centred on the axes fraction `pos`.
pub fn add_logo_on_map(
    logo: &Logo,
    rect: &PlotRect,
    zoom: f32,
    pos: (f32, f32),
) -> RenderResult<Artifact> {
    let pixmap = logo.raster(zoom)?;
    let (cx, cy) = rect.at_fraction(pos.0, pos.1);
    let x = cx - pixmap.width() as f32 / 2.0;
    let y = cy - pixmap.height() as f32 / 2.0;
    Ok(Artifact::placed(
        ArtifactKind::Logo,
        ZOrder::LOGO,
        x.round() as i32,
        y.round() as i32,
        pixmap,
    ))
}

/// Round badge with a wave line.
fn draw_mark(size: u32) -> RenderResult<Pixmap> {
    let mut pixmap = Pixmap::new(size, size).ok_or(RenderError::InvalidDimensions {
        width: size,
        height: size,
    })?;
    let s = size as f32;
    let r = s / 2.0 - 1.0;

    let mut paint = Paint::default();
    paint.anti_alias = true;

    if let Some(circle) = PathBuilder::from_circle(s / 2.0, s / 2.0, r) {
        paint.set_color_rgba8(20, 70, 140, 220);
        pixmap.fill_path(&circle, &paint, FillRule::Winding, Transform::identity(), None);
    }

    let mut pb = PathBuilder::new();
    pb.move_to(s * 0.18, s * 0.55);
    pb.cubic_to(s * 0.32, s * 0.35, s * 0.42, s * 0.35, s * 0.5, s * 0.55);
    pb.cubic_to(s * 0.58, s * 0.75, s * 0.68, s * 0.75, s * 0.82, s * 0.55);
    if let Some(wave) = pb.finish() {
        paint.set_color_rgba8(255, 255, 255, 255);
        let stroke = Stroke {
            width: (s * 0.08).max(1.0),
            ..Stroke::default()
        };
        pixmap.stroke_path(&wave, &paint, &stroke, Transform::identity(), None);
    }

    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> PlotRect {
        PlotRect {
            x: 137.5,
            y: 108.0,
            width: 852.5,
            height: 600.0,
        }
    }

    #[test]
    fn test_mark_centred_on_position() {
        let artifact = add_logo_on_map(&Logo::Mark, &rect(), LOGO_ZOOM, LOGO_POSITION).unwrap();
        let (w, h) = artifact.size();
        assert_eq!((w, h), (48, 48));
        let (x, y) = artifact.offset();
        let (cx, cy) = rect().at_fraction(0.95, 0.08);
        assert!((x as f32 + 24.0 - cx).abs() <= 1.0);
        assert!((y as f32 + 24.0 - cy).abs() <= 1.0);
    }

    #[test]
    fn test_missing_logo_file_is_error() {
        let err = Logo::load(Some(Path::new("/nonexistent/logo.png"))).unwrap_err();
        assert!(matches!(err, RenderError::Logo { .. }));
    }

    #[test]
    fn test_image_logo_scaled_by_zoom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        RgbaImage::from_pixel(200, 100, image::Rgba([0, 0, 255, 255]))
            .save(&path)
            .unwrap();
        let logo = Logo::load(Some(&path)).unwrap();
        let artifact = add_logo_on_map(&logo, &rect(), LOGO_ZOOM, LOGO_POSITION).unwrap();
        assert_eq!(artifact.size(), (20, 10));
    }
}
