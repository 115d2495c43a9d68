pub mod body;
pub mod constants;
pub mod error;
pub mod exchange;
pub mod parameters;
pub mod presets;
mod sim;
pub mod validation;
pub mod vector;

pub use body::Body;
pub use error::{PairFault, SimError, SimResult};
pub use exchange::{BodySample, SampleExchange, run_sim_loop};
pub use parameters::Parameters;
pub use sim::{
    ClockState, DirectSum, Divergence, ForceAccumulator, PairwiseSum, Simulation, SimulationClock,
    StepReport, format_elapsed, pair_force,
};
pub use validation::{Deviation, ValidationReport};
