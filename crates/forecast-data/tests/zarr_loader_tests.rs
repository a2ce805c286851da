//! Zarr loader tests against stores written by the fixture writer.

use std::path::Path;

use chrono::{Duration, TimeZone, Utc};
use forecast_common::{Extent, Projection};
use forecast_data::testdata::{write_variable_store, StoreLayout};
use forecast_data::{DataError, DatasetLoader, ZarrLoader, DIRECTION_FIELD, PERIOD_FIELD};
use test_utils::{
    apply_land_mask, create_land_mask, create_wave_direction_series, create_wave_period_series,
    fixtures, temp_test_dir,
};

fn adriatic_layout(hours: &[i64]) -> StoreLayout {
    let grid = fixtures::grid::ADRIATIC_QUARTER_DEG;
    let (min_lon, min_lat, max_lon, max_lat) = grid.bbox;
    StoreLayout {
        run: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        forecast_hours: hours.to_vec(),
        bbox: Extent::new(min_lon, min_lat, max_lon, max_lat),
        nx: grid.width,
        ny: grid.height,
    }
}

fn write_wave_stores(root: &Path, layout: &StoreLayout) -> Vec<f32> {
    let nt = layout.forecast_hours.len();
    let mut period = create_wave_period_series(layout.nx, layout.ny, nt);
    apply_land_mask(&mut period, &create_land_mask(layout.nx, layout.ny));
    write_variable_store(root, "TM10", &period, layout, "s", "sea_surface_wave_mean_period")
        .unwrap();
    write_variable_store(
        root,
        "MWD",
        &create_wave_direction_series(layout.nx, layout.ny, nt),
        layout,
        "degree true",
        "sea_surface_wave_from_direction",
    )
    .unwrap();
    period
}

#[test]
fn test_load_subsets_to_projection_extent() {
    let dir = temp_test_dir();
    let layout = adriatic_layout(&fixtures::time::FORECAST_HOURS_4);
    let period = write_wave_stores(dir.path(), &layout);

    let loader = ZarrLoader::new(dir.path());
    let ds = loader.load(&["TM10", "MWD"], Projection::Adr).unwrap();

    // adr is 12..20 E, 40..46 N on a 0.25 degree grid starting at 11 E / 47 N
    let grid = ds.grid();
    assert_eq!(grid.nx(), 33);
    assert_eq!(grid.ny(), 25);
    assert_eq!(grid.lons()[0], 12.0);
    assert_eq!(grid.lats()[0], 46.0);

    assert_eq!(ds.len(), 4);
    assert_eq!(ds.times()[3], ds.run() + Duration::hours(9));

    // first kept value: row 4, col 4 of the stored grid, timestep 0
    let mwp = ds.field(PERIOD_FIELD).unwrap();
    let stored = period[4 * layout.nx + 4];
    let loaded = mwp.values()[0];
    assert!(stored == loaded || (stored.is_nan() && loaded.is_nan()));
    assert_eq!(mwp.attrs().units.as_deref(), Some("s"));
    assert!(ds.contains(DIRECTION_FIELD));
}

#[test]
fn test_missing_store_is_reported() {
    let dir = temp_test_dir();
    let layout = adriatic_layout(&[0]);
    write_wave_stores(dir.path(), &layout);

    let loader = ZarrLoader::new(dir.path());
    let err = loader.load(&["TM10", "SWH"], Projection::Adr).unwrap_err();
    assert!(matches!(err, DataError::MissingVariable(_)), "{:?}", err);
}

#[test]
fn test_mismatched_time_axes_rejected() {
    let dir = temp_test_dir();
    let four = adriatic_layout(&fixtures::time::FORECAST_HOURS_4);
    let three = adriatic_layout(&[0, 3, 6]);

    let n4 = four.len();
    let n3 = three.len();
    write_variable_store(dir.path(), "TM10", &vec![5.0; n4], &four, "s", "period").unwrap();
    write_variable_store(dir.path(), "MWD", &vec![90.0; n3], &three, "degree", "dir").unwrap();

    let err = ZarrLoader::new(dir.path())
        .load(&["TM10", "MWD"], Projection::Adr)
        .unwrap_err();
    assert!(matches!(err, DataError::ShapeMismatch { .. }), "{:?}", err);
}

#[test]
fn test_extent_outside_grid_is_empty_selection() {
    let dir = temp_test_dir();
    let (min_lon, min_lat, max_lon, max_lat) = fixtures::bbox::SOUTH_PACIFIC;
    let layout = StoreLayout {
        run: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        forecast_hours: vec![0],
        bbox: Extent::new(min_lon, min_lat, max_lon, max_lat),
        nx: 6,
        ny: 5,
    };
    write_variable_store(dir.path(), "TM10", &vec![5.0; 30], &layout, "s", "period").unwrap();

    let err = ZarrLoader::new(dir.path())
        .load(&["TM10"], Projection::Euratl)
        .unwrap_err();
    assert!(matches!(err, DataError::EmptySelection(_)), "{:?}", err);
}

#[test]
fn test_writer_rejects_wrong_length() {
    let dir = temp_test_dir();
    let layout = adriatic_layout(&[0]);
    let err = write_variable_store(dir.path(), "TM10", &[1.0, 2.0], &layout, "s", "period")
        .unwrap_err();
    assert!(matches!(err, DataError::ShapeMismatch { .. }));
}
