use crate::{
    constants::{DEFAULT_HORIZON, DEFAULT_TIME_STEP, G_ABS, MAX_POSITION, MAX_VELOCITY},
    error::{SimError, SimResult},
};

/// Global constants of a run. Fixed once the simulation is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    /// In m^3 kg^-1 s^-2
    pub gravitational_constant: f64,
    /// Seconds per step
    pub time_step: f64,
    /// Elapsed seconds at which trajectories are validated
    pub time_horizon: f64,
    /// Divergence bound on distance from the origin, in meters
    pub max_position: f64,
    /// Divergence bound on speed, in m/s
    pub max_velocity: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            gravitational_constant: G_ABS,
            time_step: DEFAULT_TIME_STEP,
            time_horizon: DEFAULT_HORIZON,
            max_position: MAX_POSITION,
            max_velocity: MAX_VELOCITY,
        }
    }
}

impl Parameters {
    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_time_horizon(mut self, time_horizon: f64) -> Self {
        self.time_horizon = time_horizon;
        self
    }

    pub fn with_gravitational_constant(mut self, g: f64) -> Self {
        self.gravitational_constant = g;
        self
    }

    pub fn with_divergence_bounds(mut self, max_position: f64, max_velocity: f64) -> Self {
        self.max_position = max_position;
        self.max_velocity = max_velocity;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        let checks = [
            ("gravitational constant", self.gravitational_constant),
            ("time step", self.time_step),
            ("time horizon", self.time_horizon),
            ("position bound", self.max_position),
            ("velocity bound", self.max_velocity),
        ];
        for (what, value) in checks {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SimError::config(format!("{what} must be positive, got {value}")));
            }
        }
        Ok(())
    }
}
