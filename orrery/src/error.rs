//! Error types for the simulation core.

use thiserror::Error;

/// Result type for simulation operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors that stop a simulation from starting or from completing a step.
#[derive(Error, Debug)]
pub enum SimError {
    /// Invalid bodies or constants, detected before any stepping.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A degenerate pair was met while accumulating forces. Nothing was mutated.
    #[error("numerical error at step {step} (t = {elapsed} s): {fault}")]
    Numerical {
        step: u64,
        elapsed: f64,
        fault: PairFault,
    },

    #[error("cannot normalize a vector of magnitude {0}")]
    ZeroVector(f64),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SimError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SimError::Configuration(msg.into())
    }
}

/// The pair of bodies that produced a zero or non-finite distance or force.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("bodies '{first}' and '{second}' at degenerate distance {distance} m")]
pub struct PairFault {
    pub first: String,
    pub second: String,
    pub distance: f64,
}
