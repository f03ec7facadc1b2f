//! Affine curve points.

use core::fmt::{self, Debug};
use num_bigint::BigUint;
use num_traits::Zero;
use zeroize::Zeroize;

use crate::secret::wipe;

/// Point on a short Weierstrass curve in affine coordinates.
#[derive(Clone)]
pub struct AffinePoint {
    /// x-coordinate
    pub(crate) x: BigUint,

    /// y-coordinate
    pub(crate) y: BigUint,

    /// Is this point the point at infinity?
    pub(crate) infinity: bool,
}

impl AffinePoint {
    /// Additive identity of the group a.k.a. the point at infinity.
    pub fn identity() -> Self {
        Self {
            x: BigUint::zero(),
            y: BigUint::zero(),
            infinity: true,
        }
    }

    /// Create a point from its coordinates.
    ///
    /// The point is not checked against any curve equation; see
    /// [`ShortWeierstrassCurve::validate_point`][crate::ShortWeierstrassCurve::validate_point].
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Self {
            x,
            y,
            infinity: false,
        }
    }

    /// Is this point the point at infinity?
    pub fn is_identity(&self) -> bool {
        self.infinity
    }

    /// Affine x-coordinate, or `None` for the point at infinity.
    pub fn x(&self) -> Option<&BigUint> {
        (!self.infinity).then_some(&self.x)
    }

    /// Affine y-coordinate, or `None` for the point at infinity.
    pub fn y(&self) -> Option<&BigUint> {
        (!self.infinity).then_some(&self.y)
    }
}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &Self) -> bool {
        match (self.infinity, other.infinity) {
            (true, true) => true,
            (false, false) => self.x == other.x && self.y == other.y,
            _ => false,
        }
    }
}

impl Eq for AffinePoint {}

impl Default for AffinePoint {
    fn default() -> Self {
        Self::identity()
    }
}

impl Zeroize for AffinePoint {
    fn zeroize(&mut self) {
        wipe(&mut self.x);
        wipe(&mut self.y);
        self.infinity = true;
    }
}

impl Debug for AffinePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.infinity {
            return f.write_str("AffinePoint(O)");
        }

        write!(f, "AffinePoint(x={:X}, y={:X})", self.x, self.y)
    }
}
