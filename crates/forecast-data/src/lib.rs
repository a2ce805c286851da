//! Gridded forecast datasets for map rendering.
//!
//! A [`Dataset`] holds a run time, a time axis, a shared regular lat/lon
//! grid and named `time × lat × lon` fields. Datasets come from a
//! [`DatasetLoader`] (Zarr stores by default, NetCDF with the `netcdf`
//! feature), get derived fields attached by [`prepare`], and are split
//! along the time axis by [`chunks_dataset`] before rendering.
//!
//! ```text
//! ZarrLoader::load(["TM10", "MWD"], projection)
//!      │
//!      ▼
//! Dataset { mwp, mwd }
//!      │  prepare_direction_vectors(speed)
//!      ▼
//! Dataset { mwp, mwd, u, v }
//!      │  chunks_dataset(chunk_size)
//!      ▼
//! [Dataset; n]  ──►  renderer workers
//! ```

pub mod catalog;
pub mod chunks;
pub mod dataset;
pub mod error;
pub mod field;
pub mod grid;
pub mod loader;
pub mod prepare;
pub mod testdata;

pub use catalog::{dataset_name, DIRECTION_FIELD, PERIOD_FIELD, U_FIELD, V_FIELD};
pub use chunks::{chunk_ranges, chunks_dataset};
pub use dataset::{Dataset, Timestep};
pub use error::{DataError, DataResult};
pub use field::{Attributes, Field, FieldShape};
pub use grid::GeoGrid;
pub use loader::{DatasetLoader, ZarrLoader};
#[cfg(feature = "netcdf")]
pub use loader::NetCdfLoader;
pub use prepare::{prepare_direction_vectors, wind_components};
