//! Figure compositing.
//!
//! A [`Figure`] is a stack of rasterized layers. Layers added with
//! [`Figure::add_persistent`] stay for the life of the figure (land, the
//! colorbar); layers added with [`Figure::add_artifact`] belong to the
//! current frame and are dropped with [`Figure::remove_artifacts`] before
//! the next one is drawn.

use std::path::Path;

use forecast_common::{FigureConfig, SaveOptions};
use image::RgbaImage;
use tiny_skia::{ColorU8, Pixmap, PixmapPaint, Transform};
use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::png::{create_png, create_png_auto};

/// Handle returned for every layer added to a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId(u64);

/// What a layer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Land,
    Contour,
    Quiver,
    Annotation,
    Logo,
    Colorbar,
    Frame,
}

/// Drawing order; higher values are drawn on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZOrder(pub i32);

impl ZOrder {
    pub const LAND: ZOrder = ZOrder(0);
    pub const CONTOUR: ZOrder = ZOrder(1);
    pub const QUIVER: ZOrder = ZOrder(2);
    pub const FRAME: ZOrder = ZOrder(3);
    pub const COLORBAR: ZOrder = ZOrder(4);
    pub const ANNOTATION: ZOrder = ZOrder(5);
    pub const LOGO: ZOrder = ZOrder(6);
}

/// A rasterized layer and where it goes on the figure.
#[derive(Debug, Clone)]
pub struct Artifact {
    kind: ArtifactKind,
    z: ZOrder,
    x: i32,
    y: i32,
    pixmap: Pixmap,
}

impl Artifact {
    /// Layer covering the figure from its top-left corner.
    pub fn full(kind: ArtifactKind, z: ZOrder, pixmap: Pixmap) -> Self {
        Self::placed(kind, z, 0, 0, pixmap)
    }

    /// Layer whose top-left corner sits at `(x, y)`.
    pub fn placed(kind: ArtifactKind, z: ZOrder, x: i32, y: i32, pixmap: Pixmap) -> Self {
        Self {
            kind,
            z,
            x,
            y,
            pixmap,
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn z(&self) -> ZOrder {
        self.z
    }

    pub fn offset(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

/// A raster figure made of persistent and per-frame layers.
#[derive(Debug)]
pub struct Figure {
    width: u32,
    height: u32,
    dpi: u32,
    next_id: u64,
    persistent: Vec<(ArtifactId, Artifact)>,
    transient: Vec<(ArtifactId, Artifact)>,
}

impl Figure {
    pub fn new(width: u32, height: u32, dpi: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            dpi,
            next_id: 0,
            persistent: Vec::new(),
            transient: Vec::new(),
        })
    }

    pub fn from_config(config: &FigureConfig) -> RenderResult<Self> {
        let (width, height) = config.size_px();
        Self::new(width, height, config.dpi)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    fn next_id(&mut self) -> ArtifactId {
        let id = ArtifactId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a layer that stays until the figure is dropped.
    pub fn add_persistent(&mut self, artifact: Artifact) -> ArtifactId {
        let id = self.next_id();
        self.persistent.push((id, artifact));
        id
    }

    /// Add a layer for the current frame.
    pub fn add_artifact(&mut self, artifact: Artifact) -> ArtifactId {
        let id = self.next_id();
        self.transient.push((id, artifact));
        id
    }

    /// Remove layers by id. All ids are checked before anything is removed.
    pub fn remove_artifacts(&mut self, ids: &[ArtifactId]) -> RenderResult<()> {
        for id in ids {
            let known = self.transient.iter().any(|(i, _)| i == id)
                || self.persistent.iter().any(|(i, _)| i == id);
            if !known {
                return Err(RenderError::UnknownArtifact(id.0));
            }
        }
        self.transient.retain(|(i, _)| !ids.contains(i));
        self.persistent.retain(|(i, _)| !ids.contains(i));
        Ok(())
    }

    /// Number of per-frame layers currently on the figure.
    pub fn transient_count(&self) -> usize {
        self.transient.len()
    }

    /// Number of persistent layers of a kind.
    pub fn persistent_count(&self, kind: ArtifactKind) -> usize {
        self.persistent.iter().filter(|(_, a)| a.kind == kind).count()
    }

    /// Composite all layers by z order. Layers with equal z keep insertion
    /// order, persistent ones first.
    pub fn render(&self, transparent: bool) -> RenderResult<Pixmap> {
        let mut canvas = Pixmap::new(self.width, self.height).ok_or(
            RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            },
        )?;
        if !transparent {
            canvas.fill(tiny_skia::Color::WHITE);
        }

        let mut layers: Vec<&Artifact> = self
            .persistent
            .iter()
            .chain(self.transient.iter())
            .map(|(_, a)| a)
            .collect();
        layers.sort_by_key(|a| a.z);

        let paint = PixmapPaint::default();
        for layer in layers {
            canvas.draw_pixmap(
                layer.x,
                layer.y,
                layer.pixmap.as_ref(),
                &paint,
                Transform::identity(),
                None,
            );
        }
        Ok(canvas)
    }

    /// Render and encode the figure as PNG.
    pub fn encode_png(&self, options: &SaveOptions) -> RenderResult<Vec<u8>> {
        let canvas = self.render(options.transparent)?;
        let rgba = demultiply(&canvas);
        let (w, h) = (self.width as usize, self.height as usize);
        if options.indexed {
            create_png_auto(&rgba, w, h, Some(self.dpi))
        } else {
            create_png(&rgba, w, h, Some(self.dpi))
        }
    }

    /// Render, encode and write the figure to `path`.
    pub fn save_png(&self, path: &Path, options: &SaveOptions) -> RenderResult<()> {
        let png = self.encode_png(options)?;
        std::fs::write(path, &png)?;
        debug!(path = %path.display(), bytes = png.len(), "Saved figure");
        Ok(())
    }
}

/// Straight-alpha RGBA bytes of a pixmap.
pub fn demultiply(pixmap: &Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

/// Premultiplied pixmap of a straight-alpha image.
pub fn pixmap_from_rgba(img: &RgbaImage) -> RenderResult<Pixmap> {
    let (width, height) = img.dimensions();
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}
