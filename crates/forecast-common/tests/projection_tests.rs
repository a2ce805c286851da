//! Tests for the projection table and identifier parsing.

use forecast_common::{ForecastError, Projection, QuiverParams};

#[test]
fn test_quiver_table_matches_reference_values() {
    let expected = [
        ("euratl", 10, 600.0),
        ("it", 5, 500.0),
        ("adr", 3, 500.0),
        ("moc", 8, 500.0),
        ("lig", 2, 400.0),
        ("tir", 3, 400.0),
        ("jon", 4, 400.0),
        ("mor", 6, 500.0),
    ];

    for (id, density, scale) in expected {
        let p: Projection = id.parse().unwrap();
        assert_eq!(p.quiver_params(), QuiverParams { density, scale }, "{}", id);
    }
}

#[test]
fn test_quiver_table_is_total() {
    assert_eq!(Projection::all().len(), 8);
    for p in Projection::all() {
        let params = p.quiver_params();
        assert!(params.density >= 1, "{} density", p);
        assert!(params.scale > 0.0, "{} scale", p);
    }
}

#[test]
fn test_unknown_projection_fails_loudly() {
    let err = "nordic".parse::<Projection>().unwrap_err();
    match &err {
        ForecastError::UnknownProjection { id, supported } => {
            assert_eq!(id, "nordic");
            assert!(supported.contains("euratl"));
            assert!(supported.contains("mor"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("nordic"));
}

#[test]
fn test_parse_is_case_insensitive() {
    assert_eq!("EURATL".parse::<Projection>().unwrap(), Projection::Euratl);
    assert_eq!(" tir ".parse::<Projection>().unwrap(), Projection::Tir);
}

#[test]
fn test_default_projection() {
    assert_eq!(Projection::default(), Projection::Euratl);
    assert_eq!(Projection::DEFAULT.to_string(), "euratl");
}

#[test]
fn test_regional_extents_inside_wide_area() {
    let wide = Projection::Euratl.extent();
    for p in Projection::all().iter().filter(|p| **p != Projection::Euratl) {
        let e = p.extent();
        assert!(wide.contains(e.min_lon, e.min_lat), "{}", p);
        assert!(wide.contains(e.max_lon, e.max_lat), "{}", p);
    }
}
