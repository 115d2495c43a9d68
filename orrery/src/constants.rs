// PHYSICAL
/// SI gravitational constant, in m^3 kg^-1 s^-2
pub const G_ABS: f64 = 6.67408e-11;
/// Astronomical unit, in meters
pub const AU: f64 = 1.495979e11;
/// Mass of the sun, in kilograms
pub const M_SUN: f64 = 1.989e30;
/// Mass of earth, in kilograms
pub const M_EARTH: f64 = 5.9722e24;

// TIME
pub const SEC_PER_HOUR: f64 = 60.0 * 60.0;
pub const SEC_PER_DAY: f64 = SEC_PER_HOUR * 24.0;
pub const SEC_PER_YEAR: f64 = 365.25 * SEC_PER_DAY;
/// Converts a velocity in AU/day to m/s
pub const AU_PER_DAY: f64 = AU / SEC_PER_DAY;

// SIMULATION
/// Default seconds per step.
pub const DEFAULT_TIME_STEP: f64 = SEC_PER_HOUR;
/// Default validation horizon, one year.
pub const DEFAULT_HORIZON: f64 = SEC_PER_YEAR;
/// Positions further than this from the origin are flagged as diverging, ~6700 AU.
pub const MAX_POSITION: f64 = 1.0e15;
/// Velocities above this are flagged as diverging (speed of light).
pub const MAX_VELOCITY: f64 = 2.998e8;

// THREADING
/// Hard cap on number of threads to use.
pub const MAX_THREADS: usize = 4;
/// Minimum number of bodies per thread.
pub const OBJECTS_PER_THREAD: usize = 8;
/// Steps between checks of the sample exchange when running on a worker thread.
pub const CHECK_INTERVAL: u64 = 100;
