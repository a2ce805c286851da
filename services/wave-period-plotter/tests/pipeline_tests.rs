//! End-to-end plotting tests against small on-disk Zarr stores.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use forecast_common::{Extent, FigureConfig, PlotConfig, Projection, SaveOptions};
use forecast_data::testdata::{write_variable_store, StoreLayout};
use forecast_data::{prepare_direction_vectors, Dataset};
use renderer::{ArtifactKind, Figure};
use test_utils::{
    apply_land_mask, create_land_mask, create_wave_direction_series, create_wave_period_series,
    fixtures, list_file_names, temp_test_dir,
};
use wave_period_plotter::dispatch::{run_debug, run_parallel};
use wave_period_plotter::{
    load_dataset, plot_files, run, DiskSink, FrameSink, PlotContext, PlotError, PlotResult,
    RunMode, WavePeriodPlotter,
};

fn write_adriatic_stores(root: &Path, hours: &[i64]) {
    let grid = fixtures::grid::ADRIATIC_QUARTER_DEG;
    let (min_lon, min_lat, max_lon, max_lat) = grid.bbox;
    let layout = StoreLayout {
        run: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        forecast_hours: hours.to_vec(),
        bbox: Extent::new(min_lon, min_lat, max_lon, max_lat),
        nx: grid.width,
        ny: grid.height,
    };
    let nt = hours.len();
    let mask = create_land_mask(grid.width, grid.height);

    let mut period = create_wave_period_series(grid.width, grid.height, nt);
    apply_land_mask(&mut period, &mask);
    write_variable_store(root, "TM10", &period, &layout, "s", "sea_surface_wave_mean_period")
        .unwrap();

    let mut direction = create_wave_direction_series(grid.width, grid.height, nt);
    apply_land_mask(&mut direction, &mask);
    write_variable_store(
        root,
        "MWD",
        &direction,
        &layout,
        "degree true",
        "sea_surface_wave_from_direction",
    )
    .unwrap();
}

/// Small figure so the tests stay quick.
fn test_config(data_dir: &Path, images_root: &Path) -> PlotConfig {
    PlotConfig {
        processes: 2,
        chunk_size: 2,
        figure: FigureConfig {
            width_in: 4.4,
            height_in: 3.6,
            dpi: 100,
        },
        data_dir: data_dir.to_path_buf(),
        images_root: images_root.to_path_buf(),
        ..PlotConfig::default()
    }
}

fn prepared_dataset(config: &PlotConfig) -> Dataset {
    let mut dataset = load_dataset(config, Projection::Adr).unwrap();
    prepare_direction_vectors(&mut dataset, config.speed).unwrap();
    dataset
}

fn read(path: &Path) -> Vec<u8> {
    std::fs::read(path).unwrap()
}

#[test]
fn test_four_steps_two_chunks_two_workers() {
    let data = temp_test_dir();
    let images = temp_test_dir();
    write_adriatic_stores(data.path(), &fixtures::time::FORECAST_HOURS_4);

    let config = test_config(data.path(), images.path());
    let written = run(Projection::Adr, config, RunMode::Parallel).unwrap();
    assert_eq!(written.len(), 4);

    let names = list_file_names(&images.path().join("adr"));
    assert_eq!(
        names,
        vec![
            "wave_period_0.png",
            "wave_period_3.png",
            "wave_period_6.png",
            "wave_period_9.png",
        ]
    );
}

#[test]
fn test_serial_and_parallel_output_identical() {
    let data = temp_test_dir();
    write_adriatic_stores(data.path(), &fixtures::time::FORECAST_HOURS_4);
    let serial_dir = temp_test_dir();
    let parallel_dir = temp_test_dir();

    let config = test_config(data.path(), parallel_dir.path());
    let dataset = prepared_dataset(&config);
    let ctx = Arc::new(PlotContext::new(Projection::Adr, config).unwrap());

    let serial_sink = DiskSink::new(serial_dir.path()).unwrap();
    let serial = plot_files(&dataset, &ctx, &serial_sink).unwrap();

    let parallel_sink = Arc::new(DiskSink::new(parallel_dir.path()).unwrap());
    let parallel = run_parallel(&dataset, Arc::clone(&ctx), parallel_sink).unwrap();

    assert_eq!(serial.len(), 4);
    assert_eq!(parallel.len(), 4);
    for path in &serial {
        let name = path.file_name().unwrap();
        assert_eq!(read(path), read(&parallel_dir.path().join(name)), "{:?}", name);
    }
}

#[test]
fn test_colorbar_once_and_no_leftover_artifacts() {
    let data = temp_test_dir();
    let images = temp_test_dir();
    write_adriatic_stores(data.path(), &fixtures::time::FORECAST_HOURS_4);

    let config = test_config(data.path(), images.path());
    let dataset = prepared_dataset(&config);
    let ctx = PlotContext::new(Projection::Adr, config).unwrap();
    let sink = DiskSink::new(images.path()).unwrap();

    let mut plotter = WavePeriodPlotter::new(&ctx, &dataset).unwrap();
    assert_eq!(plotter.figure().persistent_count(ArtifactKind::Colorbar), 0);
    for step in dataset.timesteps() {
        plotter.plot_step(&step, &sink).unwrap();
        assert_eq!(plotter.figure().transient_count(), 0);
        assert_eq!(plotter.figure().persistent_count(ArtifactKind::Colorbar), 1);
        assert_eq!(plotter.figure().persistent_count(ArtifactKind::Land), 1);
    }
}

#[test]
fn test_debug_mode_renders_two_previews() {
    let data = temp_test_dir();
    let images = temp_test_dir();
    let preview = temp_test_dir();
    write_adriatic_stores(data.path(), &fixtures::time::FORECAST_HOURS_4);

    let config = test_config(data.path(), images.path());
    let written = run(
        Projection::Adr,
        config,
        RunMode::Debug {
            preview_dir: preview.path().to_path_buf(),
        },
    )
    .unwrap();

    assert_eq!(written.len(), 2);
    assert_eq!(
        list_file_names(preview.path()),
        vec!["wave_period_0.png", "wave_period_3.png"]
    );
    assert!(!images.path().join("adr").exists());
}

#[test]
fn test_zero_chunk_size_is_config_error() {
    let data = temp_test_dir();
    let images = temp_test_dir();
    write_adriatic_stores(data.path(), &fixtures::time::FORECAST_HOURS_4);

    let config = PlotConfig {
        chunk_size: 0,
        ..test_config(data.path(), images.path())
    };
    let err = run(Projection::Adr, config, RunMode::Parallel).unwrap_err();
    assert!(matches!(err, PlotError::Config(_)));
}

#[test]
fn test_missing_data_fails() {
    let data = temp_test_dir();
    let images = temp_test_dir();
    let config = test_config(data.path(), images.path());
    let err = run(Projection::Adr, config, RunMode::Parallel).unwrap_err();
    assert!(matches!(err, PlotError::Data(_)));
}

/// Fails on one file name and records everything else.
struct FlakySink {
    inner: DiskSink,
    fail_on: &'static str,
    seen: Mutex<Vec<String>>,
}

impl FrameSink for FlakySink {
    fn dir(&self) -> &Path {
        self.inner.dir()
    }

    fn write(&self, figure: &Figure, filename: &str, options: &SaveOptions) -> PlotResult<PathBuf> {
        self.seen.lock().unwrap().push(filename.to_string());
        if filename == self.fail_on {
            return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
        }
        self.inner.write(figure, filename, options)
    }
}

#[test]
fn test_failed_chunk_reported_after_others_finish() {
    let data = temp_test_dir();
    let images = temp_test_dir();
    write_adriatic_stores(data.path(), &fixtures::time::FORECAST_HOURS_4);

    let config = test_config(data.path(), images.path());
    let dataset = prepared_dataset(&config);
    let ctx = Arc::new(PlotContext::new(Projection::Adr, config).unwrap());
    let sink = Arc::new(FlakySink {
        inner: DiskSink::new(images.path()).unwrap(),
        fail_on: "wave_period_0.png",
        seen: Mutex::new(Vec::new()),
    });

    let err = run_parallel(&dataset, ctx, Arc::clone(&sink) as Arc<dyn FrameSink>).unwrap_err();
    match err {
        PlotError::Chunks { failed, total, .. } => {
            assert_eq!(failed, 1);
            assert_eq!(total, 2);
        }
        other => panic!("unexpected error: {other}"),
    }

    // the second chunk still wrote both of its frames
    let names = list_file_names(images.path());
    assert_eq!(names, vec!["wave_period_6.png", "wave_period_9.png"]);
    assert!(!sink.seen.lock().unwrap().contains(&"wave_period_3.png".to_string()));
}

#[test]
fn test_debug_on_single_step_dataset() {
    let data = temp_test_dir();
    let preview = temp_test_dir();
    write_adriatic_stores(data.path(), &[0]);

    let config = test_config(data.path(), preview.path());
    let dataset = prepared_dataset(&config);
    let ctx = PlotContext::new(Projection::Adr, config).unwrap();
    let sink = DiskSink::new(preview.path()).unwrap();
    let written = run_debug(&dataset, &ctx, &sink).unwrap();
    assert_eq!(written.len(), 1);
}
