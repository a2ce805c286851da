//! Writers for small on-disk datasets in the layout [`ZarrLoader`] reads.
//!
//! Used by tests and local runs without a real forecast archive.
//!
//! [`ZarrLoader`]: crate::loader::ZarrLoader

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use forecast_common::Extent;
use zarrs::array::{ArrayBuilder, DataType, FillValue};
use zarrs::array_subset::ArraySubset;
use zarrs_filesystem::FilesystemStore;

use crate::error::{DataError, DataResult};
use crate::loader::{ATTR_BBOX, ATTR_FORECAST_HOURS, ATTR_REFERENCE_TIME};

/// Time axis and grid shared by every variable of a stored dataset.
#[derive(Debug, Clone)]
pub struct StoreLayout {
    pub run: DateTime<Utc>,
    pub forecast_hours: Vec<i64>,
    /// Extent of the outermost grid points.
    pub bbox: Extent,
    pub nx: usize,
    pub ny: usize,
}

impl StoreLayout {
    /// Number of values a variable with this layout holds.
    pub fn len(&self) -> usize {
        self.forecast_hours.len() * self.nx * self.ny
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn zarr_err(e: impl std::fmt::Display) -> DataError {
    DataError::Zarr(e.to_string())
}

/// Write one variable as `<root>/<variable>.zarr`.
///
/// `values` are `[time, lat, lon]` ordered with rows running north to
/// south. Each timestep is stored as one chunk.
pub fn write_variable_store(
    root: &Path,
    variable: &str,
    values: &[f32],
    layout: &StoreLayout,
    units: &str,
    standard_name: &str,
) -> DataResult<PathBuf> {
    if values.len() != layout.len() {
        return Err(DataError::shape_mismatch(
            variable,
            (layout.forecast_hours.len(), layout.ny, layout.nx),
            values.len(),
        ));
    }

    let path = root.join(format!("{}.zarr", variable));
    std::fs::create_dir_all(&path)?;
    let store = Arc::new(FilesystemStore::new(&path).map_err(zarr_err)?);

    let nt = layout.forecast_hours.len() as u64;
    let ny = layout.ny as u64;
    let nx = layout.nx as u64;

    let mut attrs = serde_json::Map::new();
    attrs.insert(
        ATTR_REFERENCE_TIME.to_string(),
        serde_json::json!(layout.run.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    attrs.insert(
        ATTR_FORECAST_HOURS.to_string(),
        serde_json::json!(layout.forecast_hours),
    );
    attrs.insert(
        ATTR_BBOX.to_string(),
        serde_json::json!([
            layout.bbox.min_lon,
            layout.bbox.min_lat,
            layout.bbox.max_lon,
            layout.bbox.max_lat
        ]),
    );
    attrs.insert("units".to_string(), serde_json::json!(units));
    attrs.insert("standard_name".to_string(), serde_json::json!(standard_name));

    let array = ArrayBuilder::new(
        vec![nt, ny, nx],
        DataType::Float32,
        vec![1, ny.max(1), nx.max(1)].try_into().map_err(zarr_err)?,
        FillValue::from(f32::NAN),
    )
    .attributes(attrs)
    .build(store, "/")
    .map_err(zarr_err)?;

    array.store_metadata().map_err(zarr_err)?;

    let subset =
        ArraySubset::new_with_start_shape(vec![0, 0, 0], vec![nt, ny, nx]).map_err(zarr_err)?;
    array
        .store_array_subset_elements(&subset, values)
        .map_err(zarr_err)?;

    Ok(path)
}
