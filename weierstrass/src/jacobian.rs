//! Jacobian projective points.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use zeroize::Zeroize;

use crate::{AffinePoint, secret::wipe};

/// Point in Jacobian coordinates `(X, Y, Z)`, representing the affine point
/// `(X/Z², Y/Z³)`.
///
/// `Z = 0` is the point at infinity and `Z = 1` marks a point which is
/// already affine.
#[derive(Clone, Debug)]
pub struct JacobianPoint {
    pub(crate) x: BigUint,
    pub(crate) y: BigUint,
    pub(crate) z: BigUint,
}

impl JacobianPoint {
    /// The point at infinity.
    pub fn identity() -> Self {
        Self {
            x: BigUint::one(),
            y: BigUint::one(),
            z: BigUint::zero(),
        }
    }

    /// Is this point the point at infinity?
    pub fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    /// Is `Z = 1`?
    pub fn is_affine(&self) -> bool {
        self.z.is_one()
    }
}

impl Default for JacobianPoint {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<&AffinePoint> for JacobianPoint {
    fn from(p: &AffinePoint) -> Self {
        if p.infinity {
            return Self::identity();
        }

        Self {
            x: p.x.clone(),
            y: p.y.clone(),
            z: BigUint::one(),
        }
    }
}

impl From<AffinePoint> for JacobianPoint {
    fn from(p: AffinePoint) -> Self {
        Self::from(&p)
    }
}

impl Zeroize for JacobianPoint {
    fn zeroize(&mut self) {
        wipe(&mut self.x);
        wipe(&mut self.y);
        wipe(&mut self.z);
    }
}
