//! Process-wide plotting configuration.
//!
//! A single `PlotConfig` is built at startup (defaults, then an optional
//! YAML file, then environment overrides) and handed to every component.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};
use crate::projection::Projection;

/// Figure dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Figure width in inches
    pub width_in: f32,
    /// Figure height in inches
    pub height_in: f32,
    /// Dots per inch
    pub dpi: u32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width_in: 11.0,
            height_in: 9.0,
            dpi: 100,
        }
    }
}

impl FigureConfig {
    /// Figure size in pixels.
    pub fn size_px(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi as f32).round() as u32,
            (self.height_in * self.dpi as f32).round() as u32,
        )
    }
}

/// Options applied when frames are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveOptions {
    /// Leave the area outside the map transparent
    pub transparent: bool,
    /// Use an indexed palette when the frame has few enough colors
    pub indexed: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            transparent: true,
            indexed: true,
        }
    }
}

/// Storage layout of the input dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    Zarr,
    Netcdf,
}

impl FromStr for DataFormat {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zarr" => Ok(Self::Zarr),
            "netcdf" | "nc" => Ok(Self::Netcdf),
            _ => Err(ForecastError::invalid_config(
                "data_format",
                format!("unknown format '{}' (expected zarr or netcdf)", s),
            )),
        }
    }
}

/// Configuration shared by the loader, the renderer and the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Worker pool size
    pub processes: usize,
    /// Timesteps per work chunk
    pub chunk_size: usize,
    pub figure: FigureConfig,
    pub save: SaveOptions,
    /// Root folder for output images (one subfolder per projection)
    pub images_root: PathBuf,
    /// Location of the forecast data (directory of Zarr stores or a NetCDF file)
    pub data_dir: PathBuf,
    pub data_format: DataFormat,
    /// TrueType font used for annotations
    pub font_path: Option<PathBuf>,
    /// PNG logo drawn on every map
    pub logo_path: Option<PathBuf>,
    /// Constant magnitude of the direction vectors (m/s)
    pub speed: f32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            processes: 8,
            chunk_size: 10,
            figure: FigureConfig::default(),
            save: SaveOptions::default(),
            images_root: PathBuf::from("images"),
            data_dir: PathBuf::from("data"),
            data_format: DataFormat::Zarr,
            font_path: None,
            logo_path: None,
            speed: 10.0,
        }
    }
}

impl PlotConfig {
    /// Load a configuration file; missing keys take their defaults.
    pub fn from_yaml_file(path: &Path) -> ForecastResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> ForecastResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `PLOT_*` environment overrides on top of this configuration.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("PLOT_PROCESSES") {
            if let Ok(n) = val.parse() {
                self.processes = n;
            }
        }

        if let Ok(val) = std::env::var("PLOT_CHUNK_SIZE") {
            if let Ok(n) = val.parse() {
                self.chunk_size = n;
            }
        }

        if let Ok(val) = std::env::var("PLOT_DPI") {
            if let Ok(n) = val.parse() {
                self.figure.dpi = n;
            }
        }

        if let Ok(val) = std::env::var("PLOT_IMAGES_ROOT") {
            self.images_root = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("PLOT_DATA_DIR") {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("PLOT_DATA_FORMAT") {
            if let Ok(format) = val.parse() {
                self.data_format = format;
            }
        }

        if let Ok(val) = std::env::var("PLOT_FONT_PATH") {
            self.font_path = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("PLOT_LOGO_PATH") {
            self.logo_path = Some(PathBuf::from(val));
        }

        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ForecastResult<()> {
        if self.processes == 0 {
            return Err(ForecastError::invalid_config("processes", "must be at least 1"));
        }
        if self.chunk_size == 0 {
            return Err(ForecastError::invalid_config("chunk_size", "must be at least 1"));
        }
        let (w, h) = self.figure.size_px();
        if w < 64 || h < 64 {
            return Err(ForecastError::invalid_config(
                "figure",
                format!("{}x{} px is too small to draw a map", w, h),
            ));
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ForecastError::invalid_config("speed", "must be a positive number"));
        }
        Ok(())
    }

    /// Output folder for one projection.
    pub fn subfolder_images(&self, projection: Projection) -> PathBuf {
        self.images_root.join(projection.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PlotConfig::default().validate().is_ok());
    }

    #[test]
    fn test_figure_size_px() {
        assert_eq!(FigureConfig::default().size_px(), (1100, 900));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = PlotConfig::from_yaml("processes: 2\nfigure:\n  dpi: 50\n").unwrap();
        assert_eq!(config.processes, 2);
        assert_eq!(config.figure.dpi, 50);
        assert_eq!(config.chunk_size, 10);
        assert_eq!(config.figure.width_in, 11.0);
    }

    #[test]
    fn test_parse_data_format() {
        assert_eq!("zarr".parse::<DataFormat>().unwrap(), DataFormat::Zarr);
        assert_eq!("NetCDF".parse::<DataFormat>().unwrap(), DataFormat::Netcdf);
        assert_eq!(" nc ".parse::<DataFormat>().unwrap(), DataFormat::Netcdf);

        let err = "grib".parse::<DataFormat>().unwrap_err();
        assert!(matches!(err, ForecastError::InvalidConfig { ref key, .. } if key == "data_format"));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = PlotConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_subfolder_images() {
        let config = PlotConfig {
            images_root: PathBuf::from("/tmp/maps"),
            ..Default::default()
        };
        assert_eq!(
            config.subfolder_images(Projection::Adr),
            PathBuf::from("/tmp/maps/adr")
        );
    }
}
