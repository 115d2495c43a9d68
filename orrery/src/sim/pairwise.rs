use cgmath::Vector3;

use crate::{body::Body, error::PairFault, sim::pair_force};

/// Each unordered pair computed once and applied with opposite signs.
pub fn accumulate(bodies: &[Body], g: f64, out: &mut [Vector3<f64>]) -> Result<(), PairFault> {
    debug_assert_eq!(bodies.len(), out.len());
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let force = pair_force(&bodies[i], &bodies[j], g)?;
            out[i] += force;
            out[j] -= force;
        }
    }
    Ok(())
}
