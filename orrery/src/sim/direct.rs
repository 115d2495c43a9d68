use cgmath::Vector3;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator};

use crate::{body::Body, error::PairFault, sim::pair_force};

/// Every ordered pair computed on its own, parallel across target bodies.
/// Each target sums its sources in body order, so the result does not depend
/// on how the work is split between threads.
pub fn accumulate(bodies: &[Body], g: f64, out: &mut [Vector3<f64>]) -> Result<(), PairFault> {
    out.par_iter_mut()
        .enumerate()
        .try_for_each(|(i, out)| accumulate_one(bodies, i, g, out))
}

pub fn accumulate_single_threaded(
    bodies: &[Body],
    g: f64,
    out: &mut [Vector3<f64>],
) -> Result<(), PairFault> {
    out.iter_mut()
        .enumerate()
        .try_for_each(|(i, out)| accumulate_one(bodies, i, g, out))
}

#[inline]
fn accumulate_one(
    bodies: &[Body],
    i: usize,
    g: f64,
    out: &mut Vector3<f64>,
) -> Result<(), PairFault> {
    let target = &bodies[i];
    for (other_idx, other) in bodies.iter().enumerate() {
        if other_idx == i {
            continue;
        }
        *out += pair_force(target, other, g)?;
    }
    Ok(())
}
