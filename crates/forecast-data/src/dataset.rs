//! Time-indexed collections of gridded fields.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use forecast_common::ForecastTime;

use crate::error::{DataError, DataResult};
use crate::field::{Field, FieldShape};
use crate::grid::GeoGrid;

/// A forecast dataset: one run, a time axis, a grid and named fields.
///
/// Every field shares the dataset's time axis and grid; [`Dataset::insert`]
/// rejects fields of any other shape.
#[derive(Debug, Clone)]
pub struct Dataset {
    run: DateTime<Utc>,
    times: Vec<DateTime<Utc>>,
    grid: Arc<GeoGrid>,
    fields: BTreeMap<String, Field>,
}

impl Dataset {
    pub fn new(run: DateTime<Utc>, times: Vec<DateTime<Utc>>, grid: GeoGrid) -> Self {
        Self {
            run,
            times,
            grid: Arc::new(grid),
            fields: BTreeMap::new(),
        }
    }

    /// Reference time of the forecast run.
    pub fn run(&self) -> DateTime<Utc> {
        self.run
    }

    /// Valid times, in axis order.
    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn grid(&self) -> &GeoGrid {
        &self.grid
    }

    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Shape every field of this dataset must have.
    pub fn shape(&self) -> FieldShape {
        FieldShape::new(self.times.len(), self.grid.ny(), self.grid.nx())
    }

    /// Add or replace a field.
    pub fn insert(&mut self, field: Field) -> DataResult<()> {
        if field.shape() != self.shape() {
            return Err(DataError::shape_mismatch(field.name(), self.shape(), field.shape()));
        }
        self.fields.insert(field.name().to_string(), field);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field(&self, name: &str) -> DataResult<&Field> {
        self.fields
            .get(name)
            .ok_or_else(|| DataError::MissingVariable(name.to_string()))
    }

    pub fn field_mut(&mut self, name: &str) -> DataResult<&mut Field> {
        self.fields
            .get_mut(name)
            .ok_or_else(|| DataError::MissingVariable(name.to_string()))
    }

    /// Select the timestep with the given valid time.
    pub fn sel(&self, time: DateTime<Utc>) -> DataResult<Timestep<'_>> {
        let index = self
            .times
            .iter()
            .position(|t| *t == time)
            .ok_or_else(|| DataError::TimeNotFound(time.to_rfc3339()))?;
        Ok(Timestep {
            dataset: self,
            index,
        })
    }

    /// Select a timestep by position.
    pub fn step(&self, index: usize) -> DataResult<Timestep<'_>> {
        if index >= self.times.len() {
            return Err(DataError::IndexOutOfRange {
                start: index,
                end: index + 1,
                len: self.times.len(),
            });
        }
        Ok(Timestep {
            dataset: self,
            index,
        })
    }

    /// Iterate over every timestep in axis order.
    pub fn timesteps(&self) -> impl Iterator<Item = Timestep<'_>> {
        (0..self.times.len()).map(move |index| Timestep {
            dataset: self,
            index,
        })
    }

    /// Independent copy restricted to a range of timesteps.
    ///
    /// The grid is shared; field values are copied so the result can be
    /// moved to another worker.
    pub fn isel(&self, range: Range<usize>) -> DataResult<Dataset> {
        if range.start > range.end || range.end > self.times.len() {
            return Err(DataError::IndexOutOfRange {
                start: range.start,
                end: range.end,
                len: self.times.len(),
            });
        }

        let fields = self
            .fields
            .iter()
            .map(|(name, field)| (name.clone(), field.select_steps(range.clone())))
            .collect();

        Ok(Dataset {
            run: self.run,
            times: self.times[range].to_vec(),
            grid: Arc::clone(&self.grid),
            fields,
        })
    }
}

/// A single timestep view into a dataset.
#[derive(Debug, Clone, Copy)]
pub struct Timestep<'a> {
    dataset: &'a Dataset,
    index: usize,
}

impl<'a> Timestep<'a> {
    /// Position on the dataset's time axis.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn valid_time(&self) -> DateTime<Utc> {
        self.dataset.times[self.index]
    }

    /// Valid time, run and cumulative hour of this step.
    pub fn forecast_time(&self) -> ForecastTime {
        ForecastTime::new(self.dataset.run, self.valid_time())
    }

    pub fn grid(&self) -> &'a GeoGrid {
        &self.dataset.grid
    }

    /// 2-D slice (`lat × lon`, row-major) of a field at this timestep.
    pub fn field(&self, name: &str) -> DataResult<&'a [f32]> {
        let field = self.dataset.field(name)?;
        field.step(self.index).ok_or_else(|| DataError::IndexOutOfRange {
            start: self.index,
            end: self.index + 1,
            len: field.shape().ntime,
        })
    }
}
