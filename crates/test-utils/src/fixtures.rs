//! Common test fixtures for wave forecast tests.

/// Bounding boxes as `(min_lon, min_lat, max_lon, max_lat)`.
pub mod bbox {
    /// Slightly larger than the `adr` map extent.
    pub const ADRIATIC_MARGIN: (f64, f64, f64, f64) = (11.0, 39.0, 21.0, 47.0);

    /// Southern hemisphere box that overlaps none of the map extents.
    pub const SOUTH_PACIFIC: (f64, f64, f64, f64) = (-170.0, -50.0, -120.0, -10.0);
}

/// Small grid layouts.
pub mod grid {
    /// A grid layout over a bounding box.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub width: usize,
        pub height: usize,
        pub bbox: (f64, f64, f64, f64),
    }

    impl GridSpec {
        /// Number of cells in one timestep.
        pub fn size(&self) -> usize {
            self.width * self.height
        }
    }

    /// 0.25° grid over the Adriatic margin box.
    pub const ADRIATIC_QUARTER_DEG: GridSpec = GridSpec {
        width: 41,
        height: 33,
        bbox: super::bbox::ADRIATIC_MARGIN,
    };
}

/// Common time values.
pub mod time {
    /// Four consecutive three-hourly steps starting at the run.
    pub const FORECAST_HOURS_4: [i64; 4] = [0, 3, 6, 9];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_spec_size() {
        assert_eq!(grid::ADRIATIC_QUARTER_DEG.size(), 41 * 33);
    }
}
