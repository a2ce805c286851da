//! Named map projections and their rendering parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// A geographic extent in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Extent {
    pub const fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Width of the extent in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height of the extent in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Check if a point is inside the extent (edges included).
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

/// How geographic coordinates are laid out on the map plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapKind {
    /// Equidistant cylindrical (plate carrée)
    Cylindrical,
    /// Spherical Mercator
    Mercator,
}

/// Quiver decimation stride and arrow scale for a projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuiverParams {
    /// Keep every `density`-th grid point along both axes
    pub density: usize,
    /// Data units per arrow length unit (plot width)
    pub scale: f32,
}

/// Supported map domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    /// Europe and North Atlantic
    Euratl,
    /// Italy
    It,
    /// Adriatic Sea
    Adr,
    /// Western Mediterranean
    Moc,
    /// Ligurian Sea
    Lig,
    /// Tyrrhenian Sea
    Tir,
    /// Ionian Sea
    Jon,
    /// Eastern Mediterranean
    Mor,
}

const ALL: [Projection; 8] = [
    Projection::Euratl,
    Projection::It,
    Projection::Adr,
    Projection::Moc,
    Projection::Lig,
    Projection::Tir,
    Projection::Jon,
    Projection::Mor,
];

impl Projection {
    pub const DEFAULT: Projection = Projection::Euratl;

    pub fn all() -> &'static [Projection] {
        &ALL
    }

    /// Identifier used on the command line and in output folders.
    pub fn id(&self) -> &'static str {
        match self {
            Projection::Euratl => "euratl",
            Projection::It => "it",
            Projection::Adr => "adr",
            Projection::Moc => "moc",
            Projection::Lig => "lig",
            Projection::Tir => "tir",
            Projection::Jon => "jon",
            Projection::Mor => "mor",
        }
    }

    /// Geographic extent of the map.
    pub fn extent(&self) -> Extent {
        match self {
            Projection::Euratl => Extent::new(-23.5, 29.5, 45.0, 70.5),
            Projection::It => Extent::new(6.0, 36.0, 19.0, 47.5),
            Projection::Adr => Extent::new(12.0, 40.0, 20.0, 46.0),
            Projection::Moc => Extent::new(-6.0, 34.0, 16.0, 45.0),
            Projection::Lig => Extent::new(7.0, 42.5, 11.0, 44.7),
            Projection::Tir => Extent::new(8.0, 37.5, 16.5, 44.5),
            Projection::Jon => Extent::new(15.0, 36.0, 23.0, 41.0),
            Projection::Mor => Extent::new(16.0, 30.0, 36.5, 41.0),
        }
    }

    pub fn map_kind(&self) -> MapKind {
        match self {
            Projection::Euratl => MapKind::Mercator,
            _ => MapKind::Cylindrical,
        }
    }

    /// Quiver density/scale lookup. Total over every variant.
    pub fn quiver_params(&self) -> QuiverParams {
        let (density, scale) = match self {
            Projection::Euratl => (10, 600.0),
            Projection::It => (5, 500.0),
            Projection::Adr => (3, 500.0),
            Projection::Moc => (8, 500.0),
            Projection::Lig => (2, 400.0),
            Projection::Tir => (3, 400.0),
            Projection::Jon => (4, 400.0),
            Projection::Mor => (6, 500.0),
        };
        QuiverParams { density, scale }
    }

    fn supported_ids() -> String {
        ALL.iter().map(|p| p.id()).collect::<Vec<_>>().join(", ")
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for Projection {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_lowercase();
        ALL.iter()
            .copied()
            .find(|p| p.id() == id)
            .ok_or_else(|| ForecastError::UnknownProjection {
                id: s.to_string(),
                supported: Self::supported_ids(),
            })
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_ids() {
        for p in Projection::all() {
            assert_eq!(p.id().parse::<Projection>().unwrap(), *p);
        }
    }

    #[test]
    fn test_extents_are_well_formed() {
        for p in Projection::all() {
            let e = p.extent();
            assert!(e.width() > 0.0 && e.height() > 0.0, "{} extent", p);
        }
    }
}
