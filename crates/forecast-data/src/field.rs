//! Named gridded fields with metadata.

use std::ops::Range;

use crate::error::{DataError, DataResult};

/// Metadata attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub units: Option<String>,
    pub standard_name: Option<String>,
    pub long_name: Option<String>,
}

impl Attributes {
    pub fn new(units: &str, standard_name: &str) -> Self {
        Self {
            units: Some(units.to_string()),
            standard_name: Some(standard_name.to_string()),
            long_name: None,
        }
    }
}

/// Dimensions of a `time × lat × lon` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldShape {
    pub ntime: usize,
    pub ny: usize,
    pub nx: usize,
}

impl FieldShape {
    pub fn new(ntime: usize, ny: usize, nx: usize) -> Self {
        Self { ntime, ny, nx }
    }

    /// Values in a single timestep.
    pub fn step_len(&self) -> usize {
        self.ny * self.nx
    }

    /// Total number of values.
    pub fn len(&self) -> usize {
        self.ntime * self.step_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A `time × lat × lon` field stored row-major (time slowest, lon fastest).
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    attrs: Attributes,
    shape: FieldShape,
    values: Vec<f32>,
}

impl Field {
    pub fn new(
        name: impl Into<String>,
        attrs: Attributes,
        shape: FieldShape,
        values: Vec<f32>,
    ) -> DataResult<Self> {
        let name = name.into();
        if values.len() != shape.len() {
            return Err(DataError::shape_mismatch(name, shape.len(), values.len()));
        }
        Ok(Self {
            name,
            attrs,
            shape,
            values,
        })
    }

    /// A field with the same shape filled with a constant value.
    pub fn full_like(&self, name: impl Into<String>, fill: f32, attrs: Attributes) -> Field {
        Field {
            name: name.into(),
            attrs,
            shape: self.shape,
            values: vec![fill; self.values.len()],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut Attributes {
        &mut self.attrs
    }

    pub fn shape(&self) -> FieldShape {
        self.shape
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Values of one timestep.
    pub fn step(&self, index: usize) -> Option<&[f32]> {
        if index >= self.shape.ntime {
            return None;
        }
        let len = self.shape.step_len();
        Some(&self.values[index * len..(index + 1) * len])
    }

    /// Copy of the field restricted to a range of timesteps.
    pub(crate) fn select_steps(&self, range: Range<usize>) -> Field {
        let len = self.shape.step_len();
        Field {
            name: self.name.clone(),
            attrs: self.attrs.clone(),
            shape: FieldShape::new(range.len(), self.shape.ny, self.shape.nx),
            values: self.values[range.start * len..range.end * len].to_vec(),
        }
    }
}
