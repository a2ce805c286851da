//! Command line arguments and configuration layering.
//!
//! Precedence, lowest first: built-in defaults, `--config` YAML file,
//! `PLOT_*` environment variables, explicit command line flags.

use std::path::PathBuf;

use clap::Parser;
use forecast_common::{ForecastResult, PlotConfig, Projection};
use tracing::{info, Level};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "plot-wave-period")]
#[command(about = "Plot wave period and direction maps for every forecast step")]
pub struct Args {
    /// Map projection (euratl, it, adr, moc, lig, tir, jon, mor)
    pub projection: Option<String>,

    /// Render the first two steps into a preview folder instead of the image tree
    #[arg(long, env = "PLOT_DEBUG")]
    pub debug: bool,

    /// YAML configuration file
    #[arg(short, long, env = "PLOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "PLOT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Directory holding the forecast data
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Root folder for output images
    #[arg(long)]
    pub images_root: Option<PathBuf>,

    /// Worker pool size
    #[arg(long)]
    pub processes: Option<usize>,

    /// Timesteps per work chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,
}

impl Args {
    /// Projection to plot, falling back to the default when none was given.
    pub fn projection(&self) -> ForecastResult<Projection> {
        match &self.projection {
            Some(id) => id.parse(),
            None => {
                info!(
                    "Projection not defined, falling back to default ({})",
                    Projection::DEFAULT
                );
                Ok(Projection::DEFAULT)
            }
        }
    }

    /// Build the effective configuration.
    pub fn plot_config(&self) -> ForecastResult<PlotConfig> {
        let base = match &self.config {
            Some(path) => PlotConfig::from_yaml_file(path)?,
            None => PlotConfig::default(),
        };
        let config = self.apply_overrides(base.with_env_overrides());
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, mut config: PlotConfig) -> PlotConfig {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &self.images_root {
            config.images_root = dir.clone();
        }
        if let Some(n) = self.processes {
            config.processes = n;
        }
        if let Some(n) = self.chunk_size {
            config.chunk_size = n;
        }
        config
    }
}

/// Parse a `--log-level` value; unknown values mean `info`.
pub fn log_level(value: &str) -> Level {
    match value.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_projection() {
        let args = Args::try_parse_from(["plot-wave-period", "adr"]).unwrap();
        assert_eq!(args.projection().unwrap(), Projection::Adr);
    }

    #[test]
    fn test_missing_projection_defaults() {
        let args = Args::try_parse_from(["plot-wave-period"]).unwrap();
        assert_eq!(args.projection().unwrap(), Projection::Euratl);
    }

    #[test]
    fn test_unknown_projection_fails() {
        let args = Args::try_parse_from(["plot-wave-period", "pacific"]).unwrap();
        let err = args.projection().unwrap_err();
        assert!(err.to_string().contains("euratl"));
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "plot-wave-period",
            "it",
            "--processes",
            "3",
            "--chunk-size",
            "4",
            "--images-root",
            "/tmp/maps",
        ])
        .unwrap();
        let config = args.apply_overrides(PlotConfig::default());
        assert_eq!(config.processes, 3);
        assert_eq!(config.chunk_size, 4);
        assert_eq!(config.images_root, PathBuf::from("/tmp/maps"));
        assert_eq!(config.data_dir, PlotConfig::default().data_dir);
    }

    #[test]
    fn test_yaml_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.yaml");
        std::fs::write(&path, "processes: 2\nchunk_size: 5\n").unwrap();
        let args = Args {
            config: Some(path),
            chunk_size: Some(7),
            ..Args::default()
        };
        let config = args.apply_overrides(PlotConfig::from_yaml_file(args.config.as_ref().unwrap()).unwrap());
        assert_eq!(config.processes, 2);
        assert_eq!(config.chunk_size, 7);
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level("DEBUG"), Level::DEBUG);
        assert_eq!(log_level("nonsense"), Level::INFO);
    }
}
