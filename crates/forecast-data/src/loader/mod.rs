//! Dataset loaders.

use forecast_common::Projection;

use crate::dataset::Dataset;
use crate::error::DataResult;

#[cfg(feature = "netcdf")]
mod netcdf;
mod zarr;

#[cfg(feature = "netcdf")]
pub use self::netcdf::NetCdfLoader;
pub use self::zarr::{ZarrLoader, ATTR_BBOX, ATTR_FORECAST_HOURS, ATTR_REFERENCE_TIME};

/// Source of forecast datasets.
pub trait DatasetLoader {
    /// Load the named source variables, cut to the projection's extent.
    ///
    /// Variables are stored under their dataset names (see
    /// [`crate::catalog::dataset_name`]).
    fn load(&self, variables: &[&str], projection: Projection) -> DataResult<Dataset>;
}
