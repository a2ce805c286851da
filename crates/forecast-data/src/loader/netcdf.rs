//! NetCDF dataset loader.
//!
//! Reads a single CF-style file holding `time` (`<unit> since <date>`),
//! `lat`/`latitude`, `lon`/`longitude` and `[time, lat, lon]` variables.
//! Latitudes stored south to north are flipped to the north-to-south row
//! order used by [`Dataset`].

use std::path::{Path, PathBuf};

use chrono::Duration;
use forecast_common::time::parse_cf_time_units;
use forecast_common::Projection;
use tracing::{debug, info};

use crate::catalog::dataset_name;
use crate::dataset::Dataset;
use crate::error::{DataError, DataResult};
use crate::field::{Attributes, Field};
use crate::grid::GeoGrid;

use super::DatasetLoader;

/// Loads datasets from one NetCDF file.
#[derive(Debug, Clone)]
pub struct NetCdfLoader {
    path: PathBuf,
}

impl NetCdfLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetLoader for NetCdfLoader {
    fn load(&self, variables: &[&str], projection: Projection) -> DataResult<Dataset> {
        let file = netcdf::open(&self.path)
            .map_err(|e| DataError::OpenFailed(format!("{}: {}", self.path.display(), e)))?;

        let time_var = file
            .variable("time")
            .ok_or_else(|| DataError::MissingVariable("time".to_string()))?;
        let units = get_str_attr(&time_var, "units")
            .ok_or_else(|| DataError::InvalidMetadata("time has no units".to_string()))?;
        let (epoch, seconds_per_unit) = parse_cf_time_units(&units)?;
        let offsets: Vec<f64> = time_var
            .get_values(..)
            .map_err(|e| DataError::NetCdf(format!("time: {}", e)))?;
        let times: Vec<_> = offsets
            .iter()
            .map(|&t| epoch + Duration::seconds((t * seconds_per_unit as f64).round() as i64))
            .collect();
        let run = *times
            .first()
            .ok_or_else(|| DataError::InvalidMetadata("empty time axis".to_string()))?;

        let lats = read_axis(&file, &["lat", "latitude"])?;
        let lons = read_axis(&file, &["lon", "longitude"])?;
        let flip = lats.len() > 1 && lats[0] < lats[lats.len() - 1];
        let lats: Vec<f64> = if flip {
            lats.iter().rev().copied().collect()
        } else {
            lats
        };

        let full_grid = GeoGrid::new(lons, lats)?;
        let extent = projection.extent();
        let (rows, cols) = full_grid
            .subset_ranges(&extent)
            .ok_or_else(|| DataError::EmptySelection(format!("{:?}", extent)))?;
        let grid = full_grid.subset(rows.clone(), cols.clone());

        let nt = times.len();
        let (ny, nx) = (full_grid.ny(), full_grid.nx());
        let mut dataset = Dataset::new(run, times, grid);
        let shape = dataset.shape();

        debug!(
            path = %self.path.display(),
            flipped = flip,
            rows = ?rows,
            cols = ?cols,
            "Resolved NetCDF subset"
        );

        for variable in variables {
            let var = file
                .variable(variable)
                .ok_or_else(|| DataError::MissingVariable(variable.to_string()))?;

            let raw: Vec<f32> = var
                .get_values(..)
                .map_err(|e| DataError::NetCdf(format!("{}: {}", variable, e)))?;
            if raw.len() != nt * ny * nx {
                return Err(DataError::shape_mismatch(*variable, (nt, ny, nx), raw.len()));
            }

            let fill = get_f32_attr(&var, "_FillValue")
                .or_else(|| get_f32_attr(&var, "missing_value"));
            let scale = get_f32_attr(&var, "scale_factor").unwrap_or(1.0);
            let offset = get_f32_attr(&var, "add_offset").unwrap_or(0.0);

            let mut values = Vec::with_capacity(shape.len());
            for t in 0..nt {
                for row in rows.clone() {
                    let src_row = if flip { ny - 1 - row } else { row };
                    let base = (t * ny + src_row) * nx;
                    for col in cols.clone() {
                        let raw_value = raw[base + col];
                        let value = match fill {
                            Some(fill) if raw_value == fill => f32::NAN,
                            _ => raw_value * scale + offset,
                        };
                        values.push(value);
                    }
                }
            }

            let attrs = Attributes {
                units: get_str_attr(&var, "units"),
                standard_name: get_str_attr(&var, "standard_name"),
                long_name: get_str_attr(&var, "long_name"),
            };
            dataset.insert(Field::new(dataset_name(variable), attrs, shape, values)?)?;
        }

        info!(
            path = %self.path.display(),
            variables = ?variables,
            projection = %projection,
            timesteps = dataset.len(),
            "Loaded dataset"
        );

        Ok(dataset)
    }
}

fn read_axis(file: &netcdf::File, names: &[&str]) -> DataResult<Vec<f64>> {
    let var = names
        .iter()
        .find_map(|name| file.variable(name))
        .ok_or_else(|| DataError::MissingVariable(names.join("/")))?;
    var.get_values(..)
        .map_err(|e| DataError::NetCdf(format!("{}: {}", names[0], e)))
}

fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f32_attr(var: &netcdf::Variable, name: &str) -> Option<f32> {
    if !has_attr(var, name) {
        return None;
    }
    let value = var.attribute_value(name)?.ok()?;
    f32::try_from(value).ok()
}

fn get_str_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
