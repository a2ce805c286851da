//! TrueType text rendering.
//!
//! No font is bundled. A configured font must load; without one, common
//! system locations are tried. When none is found there, text drawing is
//! skipped and callers still draw boxes and marks.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};
use tracing::{debug, warn};

use crate::error::{RenderError, RenderResult};

/// Fonts tried when none is configured.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A loaded font shared between layers of a figure.
#[derive(Clone)]
pub struct TextRenderer {
    font: Arc<Font<'static>>,
    source: PathBuf,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("source", &self.source)
            .finish()
    }
}

impl TextRenderer {
    /// Load a font file.
    pub fn from_file(path: &Path) -> RenderResult<Self> {
        let font_error = |message: String| RenderError::Font {
            path: path.display().to_string(),
            message,
        };
        let bytes = std::fs::read(path).map_err(|e| font_error(e.to_string()))?;
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| font_error("not a TrueType or OpenType font".to_string()))?;
        Ok(Self {
            font: Arc::new(font),
            source: path.to_path_buf(),
        })
    }

    /// Load the configured font, or else the first system font found.
    ///
    /// A configured font that cannot be loaded is an error. Without one,
    /// returns `Ok(None)` with a warning if no system font exists either.
    pub fn load(configured: Option<&Path>) -> RenderResult<Option<Self>> {
        if let Some(path) = configured {
            let renderer = Self::from_file(path)?;
            debug!(font = %path.display(), "Loaded configured font");
            return Ok(Some(renderer));
        }

        let found = SYSTEM_FONT_CANDIDATES
            .iter()
            .map(Path::new)
            .find_map(|path| Self::from_file(path).ok());

        match &found {
            Some(renderer) => debug!(font = %renderer.source.display(), "Loaded system font"),
            None => warn!("No TrueType font found; text annotations will be skipped"),
        }
        Ok(found)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Size of `text` in pixels at `size_px`.
    pub fn measure(&self, text: &str, size_px: f32) -> (u32, u32) {
        let (w, h) = text_size(Scale::uniform(size_px), &self.font, text);
        (w.max(0) as u32, h.max(0) as u32)
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn draw(&self, img: &mut RgbaImage, text: &str, x: i32, y: i32, size_px: f32, color: [u8; 4]) {
        draw_text_mut(
            img,
            Rgba(color),
            x,
            y,
            Scale::uniform(size_px),
            &self.font,
            text,
        );
    }
}

/// Convert a font size in points to pixels at `dpi`.
pub fn points_to_px(points: f32, dpi: u32) -> f32 {
    points * dpi as f32 / 72.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_to_px() {
        assert_eq!(points_to_px(72.0, 100), 100.0);
        assert_eq!(points_to_px(9.0, 72), 9.0);
    }

    #[test]
    fn test_missing_font_file() {
        let err = TextRenderer::from_file(Path::new("/nonexistent/font.ttf")).unwrap_err();
        assert!(matches!(err, RenderError::Font { .. }));
    }

    #[test]
    fn test_configured_font_must_load() {
        let err = TextRenderer::load(Some(Path::new("/nonexistent/font.ttf"))).unwrap_err();
        match err {
            RenderError::Font { path, .. } => assert_eq!(path, "/nonexistent/font.ttf"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_configured_file_that_is_not_a_font() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        let err = TextRenderer::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("not a TrueType"));
    }
}
