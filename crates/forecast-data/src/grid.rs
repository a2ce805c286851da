//! Regular latitude/longitude grids.

use std::ops::Range;

use forecast_common::Extent;

use crate::error::{DataError, DataResult};

/// A rectilinear lat/lon grid.
///
/// Longitudes increase west to east (columns), latitudes decrease north to
/// south (rows), so row 0 is the top of the map.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoGrid {
    lons: Vec<f64>,
    lats: Vec<f64>,
}

impl GeoGrid {
    /// Create a grid from coordinate vectors.
    ///
    /// Longitudes must be strictly increasing and latitudes strictly
    /// decreasing.
    pub fn new(lons: Vec<f64>, lats: Vec<f64>) -> DataResult<Self> {
        if lons.is_empty() || lats.is_empty() {
            return Err(DataError::InvalidMetadata("empty coordinate axis".to_string()));
        }
        if !lons.windows(2).all(|w| w[1] > w[0]) {
            return Err(DataError::InvalidMetadata(
                "longitudes must be strictly increasing".to_string(),
            ));
        }
        if !lats.windows(2).all(|w| w[1] < w[0]) {
            return Err(DataError::InvalidMetadata(
                "latitudes must be strictly decreasing (north first)".to_string(),
            ));
        }
        Ok(Self { lons, lats })
    }

    /// Create an evenly spaced grid covering `bbox` with grid points on its edges.
    pub fn regular(bbox: &Extent, nx: usize, ny: usize) -> DataResult<Self> {
        let axis = |start: f64, end: f64, n: usize| -> Vec<f64> {
            if n == 1 {
                return vec![start];
            }
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + i as f64 * step).collect()
        };

        Self::new(
            axis(bbox.min_lon, bbox.max_lon, nx),
            axis(bbox.max_lat, bbox.min_lat, ny),
        )
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    /// Number of columns.
    pub fn nx(&self) -> usize {
        self.lons.len()
    }

    /// Number of rows.
    pub fn ny(&self) -> usize {
        self.lats.len()
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.nx() * self.ny()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extent spanned by the grid points.
    pub fn extent(&self) -> Extent {
        Extent::new(
            self.lons[0],
            self.lats[self.lats.len() - 1],
            self.lons[self.lons.len() - 1],
            self.lats[0],
        )
    }

    /// Row and column ranges of the grid points inside `extent`.
    ///
    /// Returns `None` when no grid point falls inside.
    pub fn subset_ranges(&self, extent: &Extent) -> Option<(Range<usize>, Range<usize>)> {
        let rows = inside_range(&self.lats, |lat| lat >= extent.min_lat && lat <= extent.max_lat)?;
        let cols = inside_range(&self.lons, |lon| lon >= extent.min_lon && lon <= extent.max_lon)?;
        Some((rows, cols))
    }

    /// Grid restricted to the given rows and columns.
    pub fn subset(&self, rows: Range<usize>, cols: Range<usize>) -> GeoGrid {
        GeoGrid {
            lons: self.lons[cols].to_vec(),
            lats: self.lats[rows].to_vec(),
        }
    }
}

/// Contiguous index range of the values matching `pred` in a monotonic axis.
fn inside_range(axis: &[f64], pred: impl Fn(f64) -> bool) -> Option<Range<usize>> {
    let start = axis.iter().position(|&v| pred(v))?;
    let end = axis.iter().rposition(|&v| pred(v))? + 1;
    Some(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_grid_edges() {
        let grid = GeoGrid::regular(&Extent::new(0.0, 40.0, 10.0, 50.0), 11, 21).unwrap();
        assert_eq!(grid.nx(), 11);
        assert_eq!(grid.ny(), 21);
        assert_eq!(grid.lons()[0], 0.0);
        assert_eq!(grid.lons()[10], 10.0);
        assert_eq!(grid.lats()[0], 50.0);
        assert_eq!(grid.lats()[20], 40.0);
        assert_eq!(grid.extent(), Extent::new(0.0, 40.0, 10.0, 50.0));
    }

    #[test]
    fn test_rejects_ascending_latitudes() {
        assert!(GeoGrid::new(vec![0.0, 1.0], vec![40.0, 41.0]).is_err());
    }

    #[test]
    fn test_subset_ranges() {
        let grid = GeoGrid::regular(&Extent::new(0.0, 40.0, 10.0, 50.0), 11, 11).unwrap();
        let (rows, cols) = grid
            .subset_ranges(&Extent::new(2.0, 42.0, 5.5, 45.0))
            .unwrap();
        // lats 50,49,...: 45 is row 5, 42 is row 8
        assert_eq!(rows, 5..9);
        assert_eq!(cols, 2..6);

        let sub = grid.subset(rows, cols);
        assert_eq!(sub.lons(), &[2.0, 3.0, 4.0, 5.0]);
        assert_eq!(sub.lats(), &[45.0, 44.0, 43.0, 42.0]);
    }

    #[test]
    fn test_subset_outside_grid() {
        let grid = GeoGrid::regular(&Extent::new(0.0, 40.0, 10.0, 50.0), 11, 11).unwrap();
        assert!(grid.subset_ranges(&Extent::new(20.0, 40.0, 30.0, 50.0)).is_none());
    }
}
