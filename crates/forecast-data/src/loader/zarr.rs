//! Zarr V3 dataset loader.
//!
//! Each variable lives in its own array at `<root>/<VAR>.zarr` with shape
//! `[time, lat, lon]` (rows north to south) and these attributes:
//!
//! | key | value |
//! |-----|-------|
//! | `reference_time` | RFC 3339 run time |
//! | `forecast_hours` | hour offset of every timestep |
//! | `bbox` | `[min_lon, min_lat, max_lon, max_lat]` of the grid points |
//! | `units`, `standard_name`, `long_name` | field metadata |

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use forecast_common::time::parse_datetime;
use forecast_common::{Extent, Projection};
use tracing::{debug, info};
use zarrs::array::Array;
use zarrs::array_subset::ArraySubset;
use zarrs_filesystem::FilesystemStore;

use crate::catalog::dataset_name;
use crate::dataset::Dataset;
use crate::error::{DataError, DataResult};
use crate::field::{Attributes, Field, FieldShape};
use crate::grid::GeoGrid;

use super::DatasetLoader;

pub const ATTR_REFERENCE_TIME: &str = "reference_time";
pub const ATTR_FORECAST_HOURS: &str = "forecast_hours";
pub const ATTR_BBOX: &str = "bbox";

/// Loads datasets from a directory of per-variable Zarr arrays.
#[derive(Debug, Clone)]
pub struct ZarrLoader {
    root: PathBuf,
}

/// Layout and metadata of one stored variable.
#[derive(Debug, Clone, PartialEq)]
struct StoreLayout {
    run: DateTime<Utc>,
    hours: Vec<i64>,
    bbox: Extent,
    /// [time, lat, lon]
    shape: [u64; 3],
}

impl ZarrLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the array holding a source variable.
    pub fn store_path(&self, variable: &str) -> PathBuf {
        self.root.join(format!("{}.zarr", variable))
    }

    fn open(&self, variable: &str) -> DataResult<Array<FilesystemStore>> {
        let path = self.store_path(variable);
        if !path.is_dir() {
            return Err(DataError::MissingVariable(format!(
                "{} (no store at {})",
                variable,
                path.display()
            )));
        }

        let store = FilesystemStore::new(&path)
            .map_err(|e| DataError::OpenFailed(format!("{}: {}", path.display(), e)))?;

        Array::open(Arc::new(store), "/")
            .map_err(|e| DataError::Zarr(format!("{}: {}", path.display(), e)))
    }
}

impl DatasetLoader for ZarrLoader {
    fn load(&self, variables: &[&str], projection: Projection) -> DataResult<Dataset> {
        let (first, rest) = variables
            .split_first()
            .ok_or_else(|| DataError::MissingVariable("no variables requested".to_string()))?;

        let array = self.open(first)?;
        let layout = read_layout(first, &array)?;

        let full_grid = GeoGrid::regular(
            &layout.bbox,
            layout.shape[2] as usize,
            layout.shape[1] as usize,
        )?;

        let extent = projection.extent();
        let (rows, cols) = full_grid
            .subset_ranges(&extent)
            .ok_or_else(|| DataError::EmptySelection(format!("{:?}", extent)))?;
        let grid = full_grid.subset(rows.clone(), cols.clone());

        let times = layout
            .hours
            .iter()
            .map(|&h| layout.run + Duration::hours(h))
            .collect();
        let mut dataset = Dataset::new(layout.run, times, grid);

        debug!(
            projection = %projection,
            rows = ?rows,
            cols = ?cols,
            timesteps = layout.hours.len(),
            "Resolved dataset subset"
        );

        let subset = ArraySubset::new_with_start_shape(
            vec![0, rows.start as u64, cols.start as u64],
            vec![layout.shape[0], rows.len() as u64, cols.len() as u64],
        )
        .map_err(|e| DataError::ReadFailed(e.to_string()))?;

        dataset.insert(read_field(first, &array, &subset, dataset.shape())?)?;

        for variable in rest {
            let array = self.open(variable)?;
            let other = read_layout(variable, &array)?;
            if other != layout {
                return Err(DataError::shape_mismatch(*variable, &layout, &other));
            }
            dataset.insert(read_field(variable, &array, &subset, dataset.shape())?)?;
        }

        info!(
            variables = ?variables,
            projection = %projection,
            timesteps = dataset.len(),
            nx = dataset.grid().nx(),
            ny = dataset.grid().ny(),
            "Loaded dataset"
        );

        Ok(dataset)
    }
}

/// Parse the grid/time layout from the array's shape and attributes.
fn read_layout(variable: &str, array: &Array<FilesystemStore>) -> DataResult<StoreLayout> {
    let shape = array.shape();
    if shape.len() != 3 {
        return Err(DataError::InvalidMetadata(format!(
            "{}: expected [time, lat, lon] array, got {} dimensions",
            variable,
            shape.len()
        )));
    }

    let attrs = array.attributes();

    let run = attrs
        .get(ATTR_REFERENCE_TIME)
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            DataError::InvalidMetadata(format!("{}: missing {}", variable, ATTR_REFERENCE_TIME))
        })
        .and_then(|s| parse_datetime(s).map_err(DataError::from))?;

    let hours: Vec<i64> = attrs
        .get(ATTR_FORECAST_HOURS)
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            DataError::InvalidMetadata(format!("{}: missing {}", variable, ATTR_FORECAST_HOURS))
        })?
        .iter()
        .map(|v| {
            v.as_i64().ok_or_else(|| {
                DataError::InvalidMetadata(format!("{}: non-integer forecast hour {}", variable, v))
            })
        })
        .collect::<DataResult<_>>()?;

    if hours.len() as u64 != shape[0] {
        return Err(DataError::InvalidMetadata(format!(
            "{}: {} forecast hours for {} timesteps",
            variable,
            hours.len(),
            shape[0]
        )));
    }

    let bbox = attrs
        .get(ATTR_BBOX)
        .and_then(|v| v.as_array())
        .and_then(|arr| {
            if arr.len() == 4 {
                Some(Extent::new(
                    arr[0].as_f64()?,
                    arr[1].as_f64()?,
                    arr[2].as_f64()?,
                    arr[3].as_f64()?,
                ))
            } else {
                None
            }
        })
        .ok_or_else(|| DataError::InvalidMetadata(format!("{}: missing or bad {}", variable, ATTR_BBOX)))?;

    Ok(StoreLayout {
        run,
        hours,
        bbox,
        shape: [shape[0], shape[1], shape[2]],
    })
}

fn read_attributes(array: &Array<FilesystemStore>) -> Attributes {
    let attrs = array.attributes();
    let text = |key: &str| attrs.get(key).and_then(|v| v.as_str()).map(str::to_string);
    Attributes {
        units: text("units"),
        standard_name: text("standard_name"),
        long_name: text("long_name"),
    }
}

fn read_field(
    variable: &str,
    array: &Array<FilesystemStore>,
    subset: &ArraySubset,
    shape: FieldShape,
) -> DataResult<Field> {
    let values: Vec<f32> = array
        .retrieve_array_subset_elements(subset)
        .map_err(|e| DataError::ReadFailed(format!("{}: {}", variable, e)))?;

    Field::new(dataset_name(variable), read_attributes(array), shape, values)
}
