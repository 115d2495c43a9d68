use cgmath::{EuclideanSpace, InnerSpace, Vector3};
use rayon::iter::{
    IndexedParallelIterator, IntoParallelRefIterator, IntoParallelRefMutIterator, ParallelIterator,
};

use crate::{body::Body, parameters::Parameters};

/// Semi-implicit Euler over all bodies. `forces[i]` is the net force on `bodies[i]`.
pub fn integrate(bodies: &mut [Body], forces: &[Vector3<f64>], delta: f64) {
    debug_assert_eq!(bodies.len(), forces.len());
    bodies
        .par_iter_mut()
        .zip(forces.par_iter())
        .for_each(|(body, force)| integrate_body(body, *force, delta));
}

#[inline]
pub fn integrate_body(body: &mut Body, force: Vector3<f64>, delta: f64) {
    let acc = force / body.mass();
    body.vel += acc * delta;
    // Position moves with the velocity just updated
    body.pos += body.vel * delta;
}

/// A body whose state left the sanity bounds after a step.
#[derive(Debug, Clone, PartialEq)]
pub struct Divergence {
    pub name: String,
    pub distance: f64,
    pub speed: f64,
}

impl std::fmt::Display for Divergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' is diverging: |r| = {:e} m, |v| = {:e} m/s",
            self.name, self.distance, self.speed
        )
    }
}

pub fn check_divergence(bodies: &[Body], params: &Parameters) -> Vec<Divergence> {
    bodies
        .iter()
        .filter_map(|body| {
            let distance = body.pos.to_vec().magnitude();
            let speed = body.vel.magnitude();
            let out_of_bounds = !distance.is_finite()
                || !speed.is_finite()
                || distance > params.max_position
                || speed > params.max_velocity;
            out_of_bounds.then(|| Divergence {
                name: body.name().to_owned(),
                distance,
                speed,
            })
        })
        .collect()
}
