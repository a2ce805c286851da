//! Derived fields for the direction overlay.
//!
//! The direction overlay draws arrows of constant length oriented by the
//! mean wave direction. The direction field is combined with a constant
//! speed field into `u`/`v` components using the meteorological
//! convention: the direction is where the flow comes from, measured
//! clockwise from north, so 0° gives `(0, -speed)`.

use crate::catalog::{DIRECTION_FIELD, U_FIELD, V_FIELD};
use crate::dataset::Dataset;
use crate::error::{DataError, DataResult};
use crate::field::{Attributes, Field};

/// Split a speed and a direction (degrees, "from", clockwise from north)
/// into eastward and northward components.
pub fn wind_components(speed: f32, direction_deg: f32) -> (f32, f32) {
    let rad = (direction_deg as f64).to_radians();
    let speed = speed as f64;
    let u = -speed * rad.sin();
    let v = -speed * rad.cos();
    (u as f32, v as f32)
}

/// Attach `u`/`v` direction components of magnitude `speed` to the dataset.
///
/// NaN directions (land points) give NaN components. Infinite directions
/// are rejected.
pub fn prepare_direction_vectors(dataset: &mut Dataset, speed: f32) -> DataResult<()> {
    let direction = dataset.field_mut(DIRECTION_FIELD)?;
    direction.attrs_mut().units = Some("degrees".to_string());
    let direction = dataset.field(DIRECTION_FIELD)?;

    if let Some(bad) = direction.values().iter().find(|v| v.is_infinite()) {
        return Err(DataError::invalid_data(
            DIRECTION_FIELD,
            format!("direction value {} is not a finite angle", bad),
        ));
    }

    let speed_field = direction.full_like("speed", speed, Attributes::new("m/s", "wind_speed"));

    let (u, v): (Vec<f32>, Vec<f32>) = speed_field
        .values()
        .iter()
        .zip(direction.values())
        .map(|(&s, &d)| wind_components(s, d))
        .unzip();

    let shape = direction.shape();
    let u = Field::new(U_FIELD, Attributes::new("", "x component direction"), shape, u)?;
    let v = Field::new(V_FIELD, Attributes::new("", "y component direction"), shape, v)?;

    dataset.insert(u)?;
    dataset.insert(v)?;

    tracing::debug!(speed, timesteps = shape.ntime, "Derived direction components");
    Ok(())
}
