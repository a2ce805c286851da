//! Named colormaps.
//!
//! Colormaps are evenly spaced colour lists loaded from a JSON catalog
//! embedded in the crate (`assets/colormaps.json`). Sampling interpolates
//! linearly between neighbouring entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Catalog embedded at build time.
const EMBEDDED_CATALOG: &str = include_str!("../assets/colormaps.json");

/// Number of samples taken when truncating a colormap.
pub const TRUNCATE_SAMPLES: usize = 100;

/// Colormap catalog loaded from JSON.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColormapCatalog {
    pub version: String,
    pub colormaps: BTreeMap<String, ColormapDefinition>,
}

/// A single catalog entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColormapDefinition {
    pub description: Option<String>,
    /// `#rrggbb` colours, evenly spaced over `[0, 1]`.
    pub colors: Vec<String>,
}

impl ColormapCatalog {
    pub fn from_json(json_str: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// The catalog shipped with the crate.
    pub fn embedded() -> RenderResult<Self> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.colormaps.keys().map(String::as_str)
    }

    /// Build the named colormap.
    pub fn get(&self, name: &str) -> RenderResult<Colormap> {
        let def = self
            .colormaps
            .get(name)
            .ok_or_else(|| RenderError::UnknownColormap {
                name: name.to_string(),
                available: self.names().collect::<Vec<_>>().join(", "),
            })?;

        let colors = def
            .colors
            .iter()
            .map(|hex| {
                hex_to_rgb(hex)
                    .map(|(r, g, b)| [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
                    .ok_or_else(|| RenderError::InvalidColor(hex.clone()))
            })
            .collect::<RenderResult<Vec<_>>>()?;

        Colormap::from_colors(name, colors)
    }
}

/// A continuous colormap over `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    /// Linear RGB in `0..=1`, evenly spaced.
    colors: Vec<[f32; 3]>,
}

impl Colormap {
    /// Build from at least two evenly spaced colours.
    pub fn from_colors(name: impl Into<String>, colors: Vec<[f32; 3]>) -> RenderResult<Self> {
        let name = name.into();
        if colors.len() < 2 {
            return Err(RenderError::InvalidCatalog(format!(
                "colormap '{}' needs at least two colours",
                name
            )));
        }
        Ok(Self { name, colors })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of anchor colours.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colour at `t` (clamped to `[0, 1]`) as floating point RGB.
    pub fn sample(&self, t: f32) -> [f32; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * (self.colors.len() - 1) as f32;
        let i = (pos.floor() as usize).min(self.colors.len() - 2);
        let frac = pos - i as f32;
        let (a, b) = (self.colors[i], self.colors[i + 1]);
        [
            a[0] + (b[0] - a[0]) * frac,
            a[1] + (b[1] - a[1]) * frac,
            a[2] + (b[2] - a[2]) * frac,
        ]
    }

    /// Opaque RGBA colour at `t`.
    pub fn rgba(&self, t: f32) -> [u8; 4] {
        let [r, g, b] = self.sample(t);
        [to_u8(r), to_u8(g), to_u8(b), 255]
    }
}

fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Look up a colormap in the embedded catalog.
pub fn get_colormap(name: &str) -> RenderResult<Colormap> {
    ColormapCatalog::embedded()?.get(name)
}

/// Restrict a colormap to `[low, high]` and stretch it back over `[0, 1]`.
///
/// The result has [`TRUNCATE_SAMPLES`] anchors sampled evenly on the
/// original range.
pub fn truncate_colormap(cmap: &Colormap, low: f32, high: f32) -> RenderResult<Colormap> {
    if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low >= high {
        return Err(RenderError::InvalidRange { low, high });
    }

    let step = (high - low) / (TRUNCATE_SAMPLES - 1) as f32;
    let colors = (0..TRUNCATE_SAMPLES)
        .map(|i| cmap.sample(low + i as f32 * step))
        .collect();

    Colormap::from_colors(format!("trunc({},{:.2},{:.2})", cmap.name, low, high), colors)
}

/// Parse hex colour string to RGB.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}
