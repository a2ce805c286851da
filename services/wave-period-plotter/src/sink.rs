//! Destinations for finished frames.

use std::path::{Path, PathBuf};

use forecast_common::SaveOptions;
use renderer::Figure;
use tracing::info;

use crate::error::PlotResult;

/// Writes a rendered figure under a file name.
pub trait FrameSink: Send + Sync {
    /// Directory frames are written to.
    fn dir(&self) -> &Path;

    /// Encode `figure` and store it as `filename`. Returns the written path.
    fn write(&self, figure: &Figure, filename: &str, options: &SaveOptions) -> PlotResult<PathBuf>;
}

/// Writes frames into the projection's image folder.
#[derive(Debug, Clone)]
pub struct DiskSink {
    dir: PathBuf,
}

impl DiskSink {
    /// Create the sink, making the folder if needed.
    pub fn new(dir: impl Into<PathBuf>) -> PlotResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl FrameSink for DiskSink {
    fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, figure: &Figure, filename: &str, options: &SaveOptions) -> PlotResult<PathBuf> {
        let path = self.dir.join(filename);
        figure.save_png(&path, options)?;
        Ok(path)
    }
}

/// Writes debug frames to a scratch folder and logs where they went.
#[derive(Debug, Clone)]
pub struct PreviewSink {
    dir: PathBuf,
}

impl PreviewSink {
    pub const DEFAULT_DIR_NAME: &'static str = "wave-period-preview";

    pub fn new(dir: impl Into<PathBuf>) -> PlotResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl FrameSink for PreviewSink {
    fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, figure: &Figure, filename: &str, options: &SaveOptions) -> PlotResult<PathBuf> {
        let path = self.dir.join(filename);
        figure.save_png(&path, options)?;
        info!(path = %path.display(), "Preview frame written");
        Ok(path)
    }
}
