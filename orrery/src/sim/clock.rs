use std::fmt::Display;

/// Relative slack on `horizon / time_step`, so a horizon that is a whole number
/// of steps still fires on that step when the step size is not representable.
const STEP_COUNT_SLACK: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    HorizonReached,
}

/// Tracks simulated time in whole steps against a fixed horizon.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    ticks: u64,
    time_step: f64,
    horizon: f64,
    horizon_tick: u64,
    state: ClockState,
}

impl SimulationClock {
    pub fn new(time_step: f64, horizon: f64) -> Self {
        // First n with horizon - n * dt < dt, i.e. floor(horizon / dt), at least 1
        let steps = horizon / time_step;
        let horizon_tick = ((steps + steps * STEP_COUNT_SLACK).floor() as u64).max(1);
        Self {
            ticks: 0,
            time_step,
            horizon,
            horizon_tick,
            state: ClockState::Running,
        }
    }

    /// Record one completed step. Returns true on the single step after which
    /// the horizon is less than one step away.
    pub fn advance(&mut self) -> bool {
        self.ticks += 1;
        if self.state == ClockState::Running && self.ticks >= self.horizon_tick {
            self.state = ClockState::HorizonReached;
            return true;
        }
        false
    }

    /// Elapsed simulated seconds. Always a whole number of steps.
    pub fn elapsed(&self) -> f64 {
        self.ticks as f64 * self.time_step
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The step on which the horizon fires.
    pub fn horizon_tick(&self) -> u64 {
        self.horizon_tick
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn horizon_reached(&self) -> bool {
        self.state == ClockState::HorizonReached
    }
}

impl Display for SimulationClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "step {} ({})", self.ticks, format_elapsed(self.elapsed()))
    }
}

/// Simulated seconds as `<days>d hh:mm:ss`, rounded to the second.
pub fn format_elapsed(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (days, rest) = (total / 86_400, total % 86_400);
    format!(
        "{days}d {:02}:{:02}:{:02}",
        rest / 3600,
        rest % 3600 / 60,
        rest % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_exactly_once() {
        let mut clock = SimulationClock::new(1000.0, 5_500.0);
        let fired: Vec<bool> = (0..10).map(|_| clock.advance()).collect();
        // 5000 s is the first elapsed time within one step of 5500 s
        assert_eq!(
            fired,
            vec![false, false, false, false, true, false, false, false, false, false]
        );
        assert!(clock.horizon_reached());
        assert_eq!(clock.ticks(), 10);
        assert_eq!(clock.elapsed(), 10_000.0);
    }

    #[test]
    fn fires_on_exact_landing() {
        let mut clock = SimulationClock::new(10.0, 30.0);
        assert!(!clock.advance());
        assert!(!clock.advance());
        assert!(clock.advance());
        assert_eq!(clock.elapsed(), 30.0);
    }

    #[test]
    fn inexact_step_still_lands_on_the_horizon() {
        // 1.0 - 9 * 0.1 rounds to just below 0.1
        let mut clock = SimulationClock::new(0.1, 1.0);
        assert_eq!(clock.horizon_tick(), 10);
        let fired_at = (1..=20).find(|_| clock.advance());
        assert_eq!(fired_at, Some(10));

        let period = 31_558_149.763_545_6;
        let clock = SimulationClock::new(period / 10_000.0, period);
        assert_eq!(clock.horizon_tick(), 10_000);
    }

    #[test]
    fn fractional_step_count_rounds_down() {
        let clock = SimulationClock::new(1000.0, 62.0 * 86_400.0);
        // 5356.8 steps
        assert_eq!(clock.horizon_tick(), 5356);
    }

    #[test]
    fn horizon_shorter_than_a_step_fires_immediately() {
        let mut clock = SimulationClock::new(3600.0, 60.0);
        assert_eq!(clock.state(), ClockState::Running);
        assert!(clock.advance());
        assert!(!clock.advance());
    }

    #[test]
    fn formats_days_and_clock_time() {
        assert_eq!(format_elapsed(0.0), "0d 00:00:00");
        assert_eq!(format_elapsed(25.0 * 3600.0 + 61.4), "1d 01:01:01");
        assert_eq!(format_elapsed(62.0 * 86_400.0), "62d 00:00:00");

        let mut clock = SimulationClock::new(3600.0, 86_400.0);
        clock.advance();
        assert_eq!(clock.to_string(), "step 1 (0d 01:00:00)");
    }
}
