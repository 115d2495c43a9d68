use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};

use crate::{
    error::{SimError, SimResult},
    vector::{VectorExt, point_is_finite},
};

/// A point mass taking part in the simulation.
///
/// Position and velocity are only ever written by the integrator; everything
/// outside the crate gets a read-only view.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    name: String,
    mass: f64,
    pub(crate) pos: Point3<f64>,
    pub(crate) vel: Vector3<f64>,
    expected_final_position: Option<Point3<f64>>,
}

impl Body {
    /// Mass in kilograms, position in meters and velocity in m/s.
    pub fn new(
        name: impl Into<String>,
        mass: f64,
        pos: Point3<f64>,
        vel: Vector3<f64>,
    ) -> SimResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SimError::config("body name must not be empty"));
        }
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(SimError::config(format!(
                "body '{name}' has non-positive mass {mass}"
            )));
        }
        if !point_is_finite(&pos) || !vel.is_finite() {
            return Err(SimError::config(format!(
                "body '{name}' has a non-finite initial state"
            )));
        }
        Ok(Self {
            name,
            mass,
            pos,
            vel,
            expected_final_position: None,
        })
    }

    /// Attach the position this body is expected to reach at the horizon.
    pub fn with_expected_final_position(mut self, expected: Point3<f64>) -> SimResult<Self> {
        let mag = expected.to_vec().magnitude();
        if !point_is_finite(&expected) || mag == 0.0 {
            return Err(SimError::config(format!(
                "body '{}' has an unusable reference position {:?}",
                self.name, expected
            )));
        }
        self.expected_final_position = Some(expected);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn position(&self) -> Point3<f64> {
        self.pos
    }

    pub fn velocity(&self) -> Vector3<f64> {
        self.vel
    }

    pub fn expected_final_position(&self) -> Option<Point3<f64>> {
        self.expected_final_position
    }

    pub fn momentum(&self) -> Vector3<f64> {
        self.vel * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.magnitude2()
    }
}
