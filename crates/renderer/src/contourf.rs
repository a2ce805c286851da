//! Filled contours.
//!
//! Values are interpolated bilinearly from the grid at every pixel centre
//! inside the map and coloured by the band they fall in. A pixel whose
//! enclosing grid cell has a NaN corner is left unfilled, so land and
//! missing data show whatever lies underneath.

use rayon::prelude::*;
use tiny_skia::{Pixmap, PremultipliedColorU8};

use crate::colormap::Colormap;
use crate::error::{RenderError, RenderResult};
use crate::map::{pixel_lookup, GridCoords, PlotRect};

/// Which out-of-range values still receive a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extend {
    #[default]
    Neither,
    Min,
    Max,
    Both,
}

impl Extend {
    pub fn extends_min(self) -> bool {
        matches!(self, Extend::Min | Extend::Both)
    }

    pub fn extends_max(self) -> bool {
        matches!(self, Extend::Max | Extend::Both)
    }
}

/// `start, start + step, ...` up to but excluding `stop`.
pub fn levels_arange(start: f32, stop: f32, step: f32) -> Vec<f32> {
    if step <= 0.0 || stop <= start {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + i as f32 * step).collect()
}

/// Contour levels with one colour per band.
///
/// `n` levels give `n - 1` bands plus an under and/or over colour when
/// extended. Colours are sampled evenly across the colormap, from the
/// under colour (if any) to the over colour (if any).
#[derive(Debug, Clone, PartialEq)]
pub struct LevelBands {
    levels: Vec<f32>,
    extend: Extend,
    /// Under colour (when extended), band colours, over colour (when extended).
    colors: Vec<[u8; 4]>,
}

impl LevelBands {
    pub fn new(levels: Vec<f32>, cmap: &Colormap, extend: Extend) -> RenderResult<Self> {
        if levels.len() < 2 {
            return Err(RenderError::InvalidLevels(format!(
                "need at least two levels, got {}",
                levels.len()
            )));
        }
        if !levels.windows(2).all(|w| w[1] > w[0]) {
            return Err(RenderError::InvalidLevels(format!(
                "levels must increase: {:?}",
                levels
            )));
        }

        let count = levels.len() - 1
            + usize::from(extend.extends_min())
            + usize::from(extend.extends_max());
        let denom = (count - 1).max(1) as f32;
        let colors = (0..count).map(|k| cmap.rgba(k as f32 / denom)).collect();

        Ok(Self {
            levels,
            extend,
            colors,
        })
    }

    pub fn levels(&self) -> &[f32] {
        &self.levels
    }

    pub fn extend(&self) -> Extend {
        self.extend
    }

    /// Number of bands between levels.
    pub fn band_count(&self) -> usize {
        self.levels.len() - 1
    }

    /// Colour of band `i` (between `levels[i]` and `levels[i + 1]`).
    pub fn band_color(&self, i: usize) -> [u8; 4] {
        self.colors[i + usize::from(self.extend.extends_min())]
    }

    pub fn under_color(&self) -> Option<[u8; 4]> {
        self.extend.extends_min().then(|| self.colors[0])
    }

    pub fn over_color(&self) -> Option<[u8; 4]> {
        self.extend
            .extends_max()
            .then(|| self.colors[self.colors.len() - 1])
    }

    /// Colour for a value, or `None` if it is NaN or outside an unextended range.
    pub fn color_for(&self, value: f32) -> Option<[u8; 4]> {
        if value.is_nan() {
            return None;
        }
        let first = self.levels[0];
        let last = self.levels[self.levels.len() - 1];
        if value < first {
            return self.under_color();
        }
        if value > last {
            return self.over_color();
        }
        // upper band edge is exclusive except for the top level
        let upper = self.levels.partition_point(|&l| l <= value);
        let band = upper.saturating_sub(1).min(self.band_count() - 1);
        Some(self.band_color(band))
    }
}

/// Bilinear value at `(row + ty, col + tx)`, `None` if any corner is NaN.
fn bilinear(values: &[f32], nx: usize, row: usize, ty: f32, col: usize, tx: f32) -> Option<f32> {
    let i00 = row * nx + col;
    let (v00, v01) = (values[i00], values[i00 + 1]);
    let (v10, v11) = (values[i00 + nx], values[i00 + nx + 1]);
    if v00.is_nan() || v01.is_nan() || v10.is_nan() || v11.is_nan() {
        return None;
    }
    let top = v00 + (v01 - v00) * tx;
    let bottom = v10 + (v11 - v10) * tx;
    Some(top + (bottom - top) * ty)
}

/// Clip a rectangle to the pixmap and return integer pixel bounds.
fn pixel_bounds(rect: &PlotRect, width: u32, height: u32) -> (usize, usize, usize, usize) {
    let x0 = rect.x.floor().max(0.0) as usize;
    let y0 = rect.y.floor().max(0.0) as usize;
    let x1 = (rect.right().ceil() as usize).min(width as usize);
    let y1 = (rect.bottom().ceil() as usize).min(height as usize);
    (x0, y0, x1.max(x0), y1.max(y0))
}

fn premultiplied(rgba: [u8; 4]) -> PremultipliedColorU8 {
    tiny_skia::ColorU8::from_rgba(rgba[0], rgba[1], rgba[2], rgba[3]).premultiply()
}

/// Paint filled contours of a 2-D slice into a transparent layer.
pub fn render_filled_contours(
    values: &[f32],
    coords: &GridCoords,
    bands: &LevelBands,
    rect: &PlotRect,
    width: u32,
    height: u32,
) -> RenderResult<Pixmap> {
    coords.check(values)?;
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;

    let (x0, y0, x1, y1) = pixel_bounds(rect, width, height);
    let cols = pixel_lookup(&coords.xs, x0, x1);
    let rows = pixel_lookup(&coords.ys, y0, y1);
    let nx = coords.nx();

    let row_len = width as usize;
    pixmap
        .pixels_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .skip(y0)
        .take(y1 - y0)
        .for_each(|(py, line)| {
            let Some((row, ty)) = rows[py - y0] else {
                return;
            };
            for (px, cell) in cols.iter().enumerate() {
                let Some((col, tx)) = *cell else {
                    continue;
                };
                if let Some(color) = bilinear(values, nx, row, ty, col, tx)
                    .and_then(|v| bands.color_for(v))
                {
                    line[x0 + px] = premultiplied(color);
                }
            }
        });

    Ok(pixmap)
}

/// Paint `color` wherever the nearest grid point is NaN.
///
/// Used with the first timestep of the period field to draw continents.
pub fn render_nan_mask(
    values: &[f32],
    coords: &GridCoords,
    color: [u8; 4],
    rect: &PlotRect,
    width: u32,
    height: u32,
) -> RenderResult<Pixmap> {
    coords.check(values)?;
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;

    let (x0, y0, x1, y1) = pixel_bounds(rect, width, height);
    let nearest = |lookup: Vec<Option<(usize, f32)>>| -> Vec<Option<usize>> {
        lookup
            .into_iter()
            .map(|cell| cell.map(|(i, t)| if t >= 0.5 { i + 1 } else { i }))
            .collect()
    };
    let cols = nearest(pixel_lookup(&coords.xs, x0, x1));
    let rows = nearest(pixel_lookup(&coords.ys, y0, y1));
    let nx = coords.nx();
    let fill = premultiplied(color);

    let row_len = width as usize;
    pixmap
        .pixels_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .skip(y0)
        .take(y1 - y0)
        .for_each(|(py, line)| {
            let Some(row) = rows[py - y0] else {
                return;
            };
            for (px, col) in cols.iter().enumerate() {
                if let Some(col) = col {
                    if values[row * nx + col].is_nan() {
                        line[x0 + px] = fill;
                    }
                }
            }
        });

    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::get_colormap;

    fn greys_bands(extend: Extend) -> LevelBands {
        let cmap = get_colormap("greys").unwrap();
        LevelBands::new(levels_arange(2.0, 14.0, 1.0), &cmap, extend).unwrap()
    }

    #[test]
    fn test_levels_arange_excludes_stop() {
        let levels = levels_arange(2.0, 14.0, 1.0);
        assert_eq!(levels.len(), 12);
        assert_eq!(levels[0], 2.0);
        assert_eq!(levels[11], 13.0);
        assert!(levels_arange(5.0, 5.0, 1.0).is_empty());
    }

    #[test]
    fn test_extend_both_color_count() {
        let bands = greys_bands(Extend::Both);
        assert_eq!(bands.band_count(), 11);
        // under and over take the colormap ends
        assert_eq!(bands.under_color(), Some([255, 255, 255, 255]));
        assert_eq!(bands.over_color(), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_color_for_out_of_range() {
        let both = greys_bands(Extend::Both);
        assert_eq!(both.color_for(0.5), both.under_color());
        assert_eq!(both.color_for(40.0), both.over_color());
        assert_eq!(both.color_for(f32::NAN), None);

        let neither = greys_bands(Extend::Neither);
        assert_eq!(neither.color_for(0.5), None);
        assert_eq!(neither.color_for(40.0), None);
        assert_eq!(neither.under_color(), None);
    }

    #[test]
    fn test_color_for_band_edges() {
        let bands = greys_bands(Extend::Both);
        assert_eq!(bands.color_for(2.0), Some(bands.band_color(0)));
        assert_eq!(bands.color_for(2.99), Some(bands.band_color(0)));
        assert_eq!(bands.color_for(3.0), Some(bands.band_color(1)));
        assert_eq!(bands.color_for(13.0), Some(bands.band_color(10)));
    }

    #[test]
    fn test_levels_must_increase() {
        let cmap = get_colormap("greys").unwrap();
        assert!(LevelBands::new(vec![1.0], &cmap, Extend::Both).is_err());
        assert!(LevelBands::new(vec![1.0, 3.0, 2.0], &cmap, Extend::Both).is_err());
    }

    #[test]
    fn test_bilinear_nan_corner() {
        let values = [1.0, 2.0, 3.0, f32::NAN];
        assert_eq!(bilinear(&values, 2, 0, 0.5, 0, 0.5), None);
        let values = [0.0, 2.0, 2.0, 4.0];
        assert_eq!(bilinear(&values, 2, 0, 0.5, 0, 0.5), Some(2.0));
    }
}
