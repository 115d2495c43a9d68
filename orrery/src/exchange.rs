use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use cgmath::{Point3, Vector3};

use crate::{body::Body, constants::CHECK_INTERVAL, sim::ForceAccumulator, sim::Simulation};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySample {
    pub pos: Point3<f64>,
    pub vel: Vector3<f64>,
}

impl From<&Body> for BodySample {
    fn from(body: &Body) -> Self {
        Self {
            pos: body.position(),
            vel: body.velocity(),
        }
    }
}

/// Primitive for handing body state from a simulation thread to a reader.
pub struct SampleExchange {
    sample: Mutex<Vec<BodySample>>,
    should_sample: AtomicBool,
    simulation_tick: AtomicU64,
}

impl SampleExchange {
    pub fn new(bodies: &[Body]) -> Self {
        Self {
            sample: Mutex::new(bodies.iter().map(BodySample::from).collect()),
            should_sample: AtomicBool::new(true),
            simulation_tick: AtomicU64::new(0),
        }
    }

    /// Return whether the reader is ready to accept a new sample.
    pub fn should_store(&self) -> bool {
        self.should_sample
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
    }

    /// Store a sample of each body, as well as the current tick.
    pub fn store<F>(&self, sim: &Simulation<F>) {
        let mut data = self.sample.lock().unwrap_or_else(PoisonError::into_inner);
        for (buff, body) in data.iter_mut().zip(sim.bodies()) {
            *buff = body.into();
        }
        self.simulation_tick
            .store(sim.clock().ticks(), Ordering::Release);
    }

    /// Copy out the latest sample and request a new one. Returns the tick it was taken at.
    pub fn sample(&self, out: &mut Vec<BodySample>) -> u64 {
        let data = self.sample.lock().unwrap_or_else(PoisonError::into_inner);
        out.clear();
        out.extend_from_slice(&data);
        let tick = self.simulation_tick.load(Ordering::Acquire);
        self.should_sample.store(true, Ordering::Release);
        tick
    }

    pub fn current_ticks(&self) -> u64 {
        self.simulation_tick.load(Ordering::Acquire)
    }
}

/// Step `sim` until `token` is set, publishing into `exchange` whenever a
/// sample was requested. Meant to run on its own thread.
pub fn run_sim_loop<F: ForceAccumulator + Send>(
    mut sim: Simulation<F>,
    exchange: &SampleExchange,
    token: &AtomicBool,
) -> crate::error::SimResult<Simulation<F>> {
    let mut i = 0;

    loop {
        i += 1;

        if let Some(report) = sim.step()?.validation {
            log::info!("\n{report}");
        }
        if i % CHECK_INTERVAL == 0 {
            if exchange.should_store() {
                exchange.store(&sim);
            }
            if token.load(Ordering::Relaxed) {
                break;
            }
        }
    }
    log::debug!("Simulation loop terminated at tick {}", sim.clock().ticks());
    Ok(sim)
}
