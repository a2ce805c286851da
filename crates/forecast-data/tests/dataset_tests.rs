//! Dataset selection and chunking tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use forecast_common::Extent;
use forecast_data::{
    chunks_dataset, Attributes, DataError, Dataset, Field, FieldShape, GeoGrid, PERIOD_FIELD,
};
use test_utils::create_wave_period_series;

const NX: usize = 6;
const NY: usize = 4;

fn run() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
}

fn period_dataset(nt: usize) -> Dataset {
    let times = (0..nt as i64).map(|h| run() + Duration::hours(h)).collect();
    let grid = GeoGrid::regular(&Extent::new(12.0, 40.0, 20.0, 46.0), NX, NY).unwrap();
    let mut ds = Dataset::new(run(), times, grid);
    let field = Field::new(
        PERIOD_FIELD,
        Attributes::new("s", "sea_surface_wave_mean_period"),
        FieldShape::new(nt, NY, NX),
        create_wave_period_series(NX, NY, nt),
    )
    .unwrap();
    ds.insert(field).unwrap();
    ds
}

#[test]
fn test_sel_by_valid_time() {
    let ds = period_dataset(5);
    let step = ds.sel(run() + Duration::hours(3)).unwrap();
    assert_eq!(step.index(), 3);
    assert_eq!(step.forecast_time().cum_hour(), 3);

    let values = step.field(PERIOD_FIELD).unwrap();
    assert_eq!(values.len(), NX * NY);
    assert_eq!(values, ds.field(PERIOD_FIELD).unwrap().step(3).unwrap());
}

#[test]
fn test_sel_unknown_time_fails() {
    let ds = period_dataset(2);
    let err = ds.sel(run() + Duration::hours(7)).unwrap_err();
    assert!(matches!(err, DataError::TimeNotFound(_)));
}

#[test]
fn test_insert_rejects_wrong_shape() {
    let mut ds = period_dataset(2);
    let bad = Field::new(
        "swh",
        Attributes::default(),
        FieldShape::new(2, NY, NX + 1),
        vec![1.0; 2 * NY * (NX + 1)],
    )
    .unwrap();
    let err = ds.insert(bad).unwrap_err();
    assert!(matches!(err, DataError::ShapeMismatch { .. }));
    assert!(!ds.contains("swh"));
}

#[test]
fn test_isel_keeps_run_and_shares_grid() {
    let ds = period_dataset(6);
    let sub = ds.isel(2..5).unwrap();
    assert_eq!(sub.len(), 3);
    assert_eq!(sub.run(), ds.run());
    assert_eq!(sub.times(), &ds.times()[2..5]);
    assert_eq!(sub.grid(), ds.grid());
    assert_eq!(
        sub.field(PERIOD_FIELD).unwrap().step(0).unwrap(),
        ds.field(PERIOD_FIELD).unwrap().step(2).unwrap()
    );
    // cumulative hours are relative to the run, not to the chunk start
    assert_eq!(sub.step(0).unwrap().forecast_time().cum_hour(), 2);
}

#[test]
fn test_isel_out_of_range() {
    let ds = period_dataset(3);
    let err = ds.isel(1..4).unwrap_err();
    assert!(matches!(err, DataError::IndexOutOfRange { end: 4, len: 3, .. }));
}

#[test]
fn test_chunks_cover_axis_in_order() {
    let ds = period_dataset(7);
    let chunks = chunks_dataset(&ds, 3).unwrap();
    assert_eq!(chunks.iter().map(Dataset::len).collect::<Vec<_>>(), vec![3, 3, 1]);

    let rejoined: Vec<_> = chunks.iter().flat_map(|c| c.times().to_vec()).collect();
    assert_eq!(rejoined, ds.times());
}

#[test]
fn test_chunk_size_zero_is_error() {
    let ds = period_dataset(2);
    assert!(matches!(
        chunks_dataset(&ds, 0),
        Err(DataError::InvalidChunkSize)
    ));
}

#[test]
fn test_empty_dataset_has_no_chunks() {
    let ds = period_dataset(0);
    assert!(chunks_dataset(&ds, 4).unwrap().is_empty());
}
