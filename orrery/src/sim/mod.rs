use std::collections::HashMap;

use cgmath::{InnerSpace, Vector3, Zero};
use log::{debug, info, warn};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::{
    body::Body,
    constants::{MAX_THREADS, OBJECTS_PER_THREAD},
    error::{PairFault, SimError, SimResult},
    parameters::Parameters,
    validation::{ValidationReport, validate},
    vector::VectorExt,
};

pub use clock::{ClockState, SimulationClock, format_elapsed};
pub use integrator::Divergence;

mod clock;
mod direct;
mod integrator;
mod pairwise;

/// Force exerted by `other` on `target`.
#[inline]
pub fn pair_force(target: &Body, other: &Body, g: f64) -> Result<Vector3<f64>, PairFault> {
    let rel = target.pos - other.pos;
    let dist = rel.magnitude();
    let fault = || PairFault {
        first: target.name().to_owned(),
        second: other.name().to_owned(),
        distance: dist,
    };
    if dist == 0.0 || !dist.is_finite() {
        return Err(fault());
    }
    let force = -rel / dist * (g * (target.mass() * other.mass()) / (dist * dist));
    if !force.is_finite() {
        return Err(fault());
    }
    Ok(force)
}

/// Computes the net force on every body from a snapshot of all of them.
pub trait ForceAccumulator {
    /// `out` is zeroed and has one entry per body, in body order.
    fn accumulate(
        &mut self,
        bodies: &[Body],
        g: f64,
        out: &mut [Vector3<f64>],
    ) -> Result<(), PairFault>;

    fn accumulate_single_threaded(
        &mut self,
        bodies: &[Body],
        g: f64,
        out: &mut [Vector3<f64>],
    ) -> Result<(), PairFault>;
}

/// Full directional pass over ordered pairs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectSum;

impl ForceAccumulator for DirectSum {
    fn accumulate(
        &mut self,
        bodies: &[Body],
        g: f64,
        out: &mut [Vector3<f64>],
    ) -> Result<(), PairFault> {
        direct::accumulate(bodies, g, out)
    }

    fn accumulate_single_threaded(
        &mut self,
        bodies: &[Body],
        g: f64,
        out: &mut [Vector3<f64>],
    ) -> Result<(), PairFault> {
        direct::accumulate_single_threaded(bodies, g, out)
    }
}

/// Half pass over unordered pairs using antisymmetry.
#[derive(Debug, Default, Clone, Copy)]
pub struct PairwiseSum;

impl ForceAccumulator for PairwiseSum {
    fn accumulate(
        &mut self,
        bodies: &[Body],
        g: f64,
        out: &mut [Vector3<f64>],
    ) -> Result<(), PairFault> {
        pairwise::accumulate(bodies, g, out)
    }

    fn accumulate_single_threaded(
        &mut self,
        bodies: &[Body],
        g: f64,
        out: &mut [Vector3<f64>],
    ) -> Result<(), PairFault> {
        pairwise::accumulate(bodies, g, out)
    }
}

fn compute_target_threads(n_objects: usize) -> usize {
    n_objects.div_ceil(OBJECTS_PER_THREAD).clamp(1, MAX_THREADS)
}

/// What a completed step exposes to collaborators.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: u64,
    pub elapsed: f64,
    pub divergences: Vec<Divergence>,
    /// Present only on the step that reached the horizon.
    pub validation: Option<ValidationReport>,
}

/// Owns the bodies, constants, clock and worker pool of one run.
pub struct Simulation<F = DirectSum> {
    bodies: Vec<Body>,
    index: HashMap<String, usize>,
    params: Parameters,
    clock: SimulationClock,
    out_buffer: Vec<Vector3<f64>>,
    pool: ThreadPool,
    accumulator: F,
}

impl Simulation<DirectSum> {
    pub fn new(bodies: Vec<Body>, params: Parameters) -> SimResult<Self> {
        Self::with_accumulator(bodies, params, DirectSum)
    }
}

impl<F: ForceAccumulator + Send> Simulation<F> {
    pub fn with_accumulator(
        bodies: Vec<Body>,
        params: Parameters,
        accumulator: F,
    ) -> SimResult<Self> {
        params.validate()?;
        if bodies.is_empty() {
            return Err(SimError::config("a simulation needs at least one body"));
        }

        let mut index = HashMap::with_capacity(bodies.len());
        for (idx, body) in bodies.iter().enumerate() {
            if index.insert(body.name().to_owned(), idx).is_some() {
                return Err(SimError::config(format!(
                    "duplicate body name '{}'",
                    body.name()
                )));
            }
        }

        let n_threads = compute_target_threads(bodies.len());
        debug!(
            "Simulation with {} bodies on {} threads, dt = {} s",
            bodies.len(),
            n_threads,
            params.time_step
        );

        Ok(Self {
            out_buffer: vec![Vector3::zero(); bodies.len()],
            pool: ThreadPoolBuilder::new().num_threads(n_threads).build()?,
            clock: SimulationClock::new(params.time_step, params.time_horizon),
            bodies,
            index,
            params,
            accumulator,
        })
    }

    /// Advance by one step: forces over the current snapshot, then integration,
    /// then the clock. On error nothing has been mutated.
    pub fn step(&mut self) -> SimResult<StepReport> {
        let g = self.params.gravitational_constant;
        let delta = self.params.time_step;

        for f in self.out_buffer.iter_mut() {
            *f = Vector3::zero();
        }

        let bodies = &mut self.bodies;
        let out_buffer = &mut self.out_buffer;
        let accumulator = &mut self.accumulator;
        let result = self.pool.install(|| -> Result<(), PairFault> {
            // All forces come from the pre-step snapshot before anything moves
            accumulator.accumulate(bodies, g, out_buffer)?;
            integrator::integrate(bodies, out_buffer, delta);
            Ok(())
        });
        if let Err(fault) = result {
            return Err(SimError::Numerical {
                step: self.clock.ticks() + 1,
                elapsed: self.clock.elapsed(),
                fault,
            });
        }

        let divergences = integrator::check_divergence(&self.bodies, &self.params);
        for d in &divergences {
            warn!("Step {}: {}", self.clock.ticks() + 1, d);
        }

        let validation = if self.clock.advance() {
            let report = self.validate();
            info!(
                "Horizon reached at {}; validating {} bodies",
                self.clock,
                report.entries.len()
            );
            Some(report)
        } else {
            None
        };

        Ok(StepReport {
            step: self.clock.ticks(),
            elapsed: self.clock.elapsed(),
            divergences,
            validation,
        })
    }

    /// Run `steps` steps. Returns the validation report if the horizon was reached on the way.
    pub fn run(&mut self, steps: u64) -> SimResult<Option<ValidationReport>> {
        let mut validation = None;
        for _ in 0..steps {
            if let Some(report) = self.step()?.validation {
                validation = Some(report);
            }
        }
        Ok(validation)
    }

    /// Step until the horizon fires. If it already has, validates the current state.
    pub fn run_to_horizon(&mut self) -> SimResult<ValidationReport> {
        while !self.clock.horizon_reached() {
            if let Some(report) = self.step()?.validation {
                return Ok(report);
            }
        }
        Ok(self.validate())
    }
}

impl<F> Simulation<F> {
    /// Compare current positions against the bodies' reference positions.
    pub fn validate(&self) -> ValidationReport {
        validate(&self.bodies, self.clock.ticks(), self.clock.elapsed())
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, name: &str) -> Option<&Body> {
        self.index_of(name).map(|idx| &self.bodies[idx])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn total_momentum(&self) -> Vector3<f64> {
        self.bodies
            .iter()
            .fold(Vector3::zero(), |acc, body| acc + body.momentum())
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    /// Sum of -G m_i m_j / r_ij over unordered pairs. Coincident pairs are skipped.
    pub fn potential_energy(&self) -> f64 {
        let g = self.params.gravitational_constant;
        let mut energy = 0.0;
        for (i, a) in self.bodies.iter().enumerate() {
            for b in &self.bodies[i + 1..] {
                let dist = (a.pos - b.pos).magnitude();
                if dist > 0.0 {
                    energy -= g * a.mass() * b.mass() / dist;
                }
            }
        }
        energy
    }

    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy() + self.potential_energy()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{EuclideanSpace, Point3};

    use super::*;

    fn body(name: &str, mass: f64, x: f64) -> Body {
        Body::new(name, mass, Point3::new(x, 0.0, 0.0), Vector3::zero()).unwrap()
    }

    #[test]
    fn pair_force_is_attractive_inverse_square() {
        let a = body("a", 2.0, 0.0);
        let b = body("b", 3.0, 2.0);
        let f = pair_force(&a, &b, 1.0).unwrap();
        // G m_a m_b / r^2 = 6 / 4, pointing from a towards b
        assert!((f.x - 1.5).abs() < 1e-15);
        assert_eq!(f.y, 0.0);
        assert_eq!(f.z, 0.0);
    }

    #[test]
    fn pair_force_rejects_coincident_bodies() {
        let a = body("a", 1.0, 1.0);
        let b = body("b", 1.0, 1.0);
        let fault = pair_force(&a, &b, 1.0).unwrap_err();
        assert_eq!(fault.first, "a");
        assert_eq!(fault.second, "b");
        assert_eq!(fault.distance, 0.0);
    }

    #[test]
    fn rejects_duplicate_names_and_empty_sets() {
        let res = Simulation::new(
            vec![body("a", 1.0, 0.0), body("a", 1.0, 1.0)],
            Parameters::default(),
        );
        assert!(matches!(res, Err(SimError::Configuration(_))));
        assert!(Simulation::new(vec![], Parameters::default()).is_err());
        assert!(
            Simulation::new(vec![body("a", 1.0, 0.0)], Parameters::default().with_time_step(0.0))
                .is_err()
        );
    }

    #[test]
    fn lookup_by_name_follows_insertion_order() {
        let sim = Simulation::new(
            vec![body("sun", 10.0, 0.0), body("earth", 1.0, 5.0)],
            Parameters::default(),
        )
        .unwrap();
        assert_eq!(sim.index_of("sun"), Some(0));
        assert_eq!(sim.index_of("earth"), Some(1));
        assert_eq!(sim.body("earth").unwrap().mass(), 1.0);
        assert!(sim.body("mars").is_none());
    }

    #[test]
    fn direct_and_pairwise_agree() {
        let bodies = vec![
            body("a", 5.0, 0.0),
            Body::new("b", 3.0, Point3::new(1.0, 2.0, 0.5), Vector3::zero()).unwrap(),
            Body::new("c", 7.0, Point3::new(-3.0, 0.5, 1.0), Vector3::zero()).unwrap(),
            Body::new("d", 1.0, Point3::new(0.2, -4.0, -2.0), Vector3::zero()).unwrap(),
        ];
        let mut direct = vec![Vector3::zero(); 4];
        let mut pairwise = vec![Vector3::zero(); 4];
        DirectSum.accumulate(&bodies, 1.0, &mut direct).unwrap();
        PairwiseSum.accumulate(&bodies, 1.0, &mut pairwise).unwrap();
        assert_eq!(direct, pairwise);
    }

    #[test]
    fn single_and_multi_threaded_direct_sum_are_identical() {
        let bodies: Vec<_> = (0..20)
            .map(|i| {
                let f = i as f64;
                Body::new(
                    format!("b{i}"),
                    1.0 + f,
                    Point3::new(f, (f * 0.7).sin(), (f * 1.3).cos()),
                    Vector3::zero(),
                )
                .unwrap()
            })
            .collect();
        let mut par = vec![Vector3::zero(); bodies.len()];
        let mut seq = vec![Vector3::zero(); bodies.len()];
        DirectSum.accumulate(&bodies, 1.0, &mut par).unwrap();
        DirectSum
            .accumulate_single_threaded(&bodies, 1.0, &mut seq)
            .unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn numerical_error_leaves_state_untouched() {
        let mut sim = Simulation::new(
            vec![body("a", 1.0, 3.0), body("b", 1.0, 3.0)],
            Parameters::default(),
        )
        .unwrap();
        let before = sim.bodies().to_vec();
        let err = sim.step().unwrap_err();
        match err {
            SimError::Numerical { step, elapsed, .. } => {
                assert_eq!(step, 1);
                assert_eq!(elapsed, 0.0);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(sim.bodies(), before.as_slice());
        assert_eq!(sim.clock().ticks(), 0);
    }

    #[test]
    fn validation_fires_once_on_horizon() {
        let earth = body("earth", 1.0, 10.0)
            .with_expected_final_position(Point3::new(10.0, 0.0, 0.0))
            .unwrap();
        let params = Parameters::default()
            .with_gravitational_constant(1e-12)
            .with_time_step(1.0)
            .with_time_horizon(3.0);
        let mut sim = Simulation::new(vec![body("sun", 1.0, 0.0), earth], params).unwrap();

        let reports: Vec<_> = (0..6).map(|_| sim.step().unwrap()).collect();
        let fired: Vec<_> = reports.iter().map(|r| r.validation.is_some()).collect();
        assert_eq!(fired, vec![false, false, true, false, false, false]);

        let report = reports[2].validation.as_ref().unwrap();
        assert_eq!(report.step, 3);
        assert_eq!(report.entries.len(), 1);
        assert!(report.get("earth").unwrap().deviation_percent < 1e-6);
        assert_eq!(sim.elapsed(), 6.0);
        assert!(sim.body("sun").unwrap().position().to_vec().magnitude() > 0.0);
    }

    #[test]
    fn run_to_horizon_after_horizon_revalidates() {
        let params = Parameters::default().with_time_step(10.0).with_time_horizon(20.0);
        let mut sim = Simulation::new(vec![body("a", 1.0, 0.0)], params).unwrap();
        let first = sim.run_to_horizon().unwrap();
        assert_eq!(first.step, 2);
        let again = sim.run_to_horizon().unwrap();
        assert_eq!(again.step, 2);
        assert!(again.entries.is_empty());
    }

    #[test]
    fn energy_of_two_body_system() {
        let sim = Simulation::new(
            vec![body("a", 2.0, 0.0), body("b", 3.0, 2.0)],
            Parameters::default().with_gravitational_constant(1.0),
        )
        .unwrap();
        assert_eq!(sim.kinetic_energy(), 0.0);
        assert!((sim.potential_energy() + 3.0).abs() < 1e-15);
        assert_eq!(sim.total_momentum(), Vector3::zero());
    }
}
