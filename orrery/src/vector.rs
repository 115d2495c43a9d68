use cgmath::{InnerSpace, Point3, Vector3};

use crate::error::{SimError, SimResult};

/// Checked helpers on top of cgmath's vector operations.
pub trait VectorExt: Sized {
    fn is_finite(&self) -> bool;

    /// Unit vector in the same direction, rejecting zero and non-finite magnitudes.
    fn try_normalize(&self) -> SimResult<Self>;
}

impl VectorExt for Vector3<f64> {
    #[inline]
    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    fn try_normalize(&self) -> SimResult<Self> {
        let mag = self.magnitude();
        if mag == 0.0 || !mag.is_finite() {
            return Err(SimError::ZeroVector(mag));
        }
        Ok(*self / mag)
    }
}

#[inline]
pub fn point_is_finite(p: &Point3<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}
