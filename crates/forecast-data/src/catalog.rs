//! Mapping from source variable short names to dataset field names.

/// Mean wave period field.
pub const PERIOD_FIELD: &str = "mwp";
/// Mean wave direction field.
pub const DIRECTION_FIELD: &str = "mwd";
/// Derived x component of the direction vectors.
pub const U_FIELD: &str = "u";
/// Derived y component of the direction vectors.
pub const V_FIELD: &str = "v";

/// Known source variables and the names they take in a dataset.
const VARIABLES: &[(&str, &str)] = &[
    ("TM10", PERIOD_FIELD),
    ("MWD", DIRECTION_FIELD),
    ("SWH", "swh"),
    ("PP1D", "pp1d"),
];

/// Dataset name for a source variable; unknown names are lower-cased.
pub fn dataset_name(source: &str) -> String {
    VARIABLES
        .iter()
        .find(|(src, _)| src.eq_ignore_ascii_case(source))
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| source.to_lowercase())
}
