//! Short Weierstrass curves over prime fields.
//!
//! Point arithmetic is done in Jacobian coordinates and every coordinate is
//! reduced into `[0, p)` after each operation.

use core::fmt::{self, Debug};
use num_bigint::BigUint;
use num_traits::Zero;

use crate::{AffinePoint, Error, JacobianPoint, Result};

/// Curve `y² = x³ + ax + b` over the prime field `GF(p)`.
#[derive(Clone, PartialEq, Eq)]
pub struct ShortWeierstrassCurve {
    p: BigUint,
    a: BigUint,
    b: BigUint,

    /// Bit length of `p`.
    bits: u64,

    /// Byte length of `p`.
    len: usize,

    /// `2⁻¹ mod p`
    inv2: BigUint,

    /// `(p - 1) / 2`, the Euler criterion exponent.
    pub(crate) euler: BigUint,
}

impl ShortWeierstrassCurve {
    /// Create a curve from the field modulus `p` and equation coefficients.
    ///
    /// `p` must be an odd prime greater than 3; this is not checked beyond
    /// oddness. `a` and `b` must be reduced and the curve non-singular.
    pub fn new(p: BigUint, a: BigUint, b: BigUint) -> Result<Self> {
        if p <= BigUint::from(3u32) || (&p % 2u32).is_zero() || a >= p || b >= p {
            return Err(Error::InvalidParameter);
        }

        // 4a³ + 27b² ≠ 0
        let disc = (BigUint::from(4u32) * a.modpow(&BigUint::from(3u32), &p)
            + BigUint::from(27u32) * &b * &b)
            % &p;
        if disc.is_zero() {
            return Err(Error::InvalidParameter);
        }

        Ok(Self {
            bits: p.bits(),
            len: p.to_bytes_be().len(),
            inv2: (&p + 1u32) >> 1,
            euler: (&p - 1u32) >> 1,
            p,
            a,
            b,
        })
    }

    /// Field modulus.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Coefficient `a`.
    pub fn a(&self) -> &BigUint {
        &self.a
    }

    /// Coefficient `b`.
    pub fn b(&self) -> &BigUint {
        &self.b
    }

    /// Bit length of the field modulus.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Size of a serialized coordinate in bytes.
    pub fn coordinate_len(&self) -> usize {
        self.len
    }

    pub(crate) fn add_mod(&self, x: &BigUint, y: &BigUint) -> BigUint {
        let s = x + y;
        if s >= self.p { s - &self.p } else { s }
    }

    pub(crate) fn sub_mod(&self, x: &BigUint, y: &BigUint) -> BigUint {
        if x >= y {
            x - y
        } else {
            (x + &self.p) - y
        }
    }

    pub(crate) fn mul_mod(&self, x: &BigUint, y: &BigUint) -> BigUint {
        (x * y) % &self.p
    }

    pub(crate) fn square(&self, x: &BigUint) -> BigUint {
        self.mul_mod(x, x)
    }

    /// Right-hand side of the curve equation, `x³ + ax + b mod p`.
    pub fn rhs(&self, x: &BigUint) -> BigUint {
        let x = x % &self.p;
        let x3 = self.mul_mod(&self.square(&x), &x);
        let ax = self.mul_mod(&self.a, &x);
        self.add_mod(&self.add_mod(&x3, &ax), &self.b)
    }

    /// Does `point` satisfy the curve equation?
    ///
    /// The point at infinity has no affine coordinates and is rejected.
    pub fn is_on_curve(&self, point: &AffinePoint) -> bool {
        !point.infinity
            && point.x < self.p
            && point.y < self.p
            && self.square(&point.y) == self.rhs(&point.x)
    }

    /// Check `point` lies on the curve.
    pub fn validate_point(&self, point: &AffinePoint) -> Result<()> {
        if point.infinity {
            return Err(Error::PointAtInfinity);
        }

        if self.is_on_curve(point) {
            Ok(())
        } else {
            Err(Error::PointNotOnCurve)
        }
    }

    /// Compute `2·P`.
    ///
    /// Points with `Y = 0` have order two and double to infinity.
    pub fn double(&self, point: &JacobianPoint) -> JacobianPoint {
        if point.is_identity() || point.y.is_zero() {
            return JacobianPoint::identity();
        }

        let JacobianPoint { x, y, z } = point;

        let yy = self.square(y);
        let a = self.mul_mod(x, &yy);
        let zz = self.square(z);
        let m = self.add_mod(
            &self.mul_mod(&BigUint::from(3u32), &self.square(x)),
            &self.mul_mod(&self.a, &self.square(&zz)),
        );
        let b = self.mul_mod(&self.inv2, &m);

        let x3 = self.sub_mod(&self.square(&b), &self.add_mod(&a, &a));
        let y3 = self.sub_mod(
            &self.mul_mod(&b, &self.sub_mod(&a, &x3)),
            &self.square(&yy),
        );
        let z3 = self.mul_mod(y, z);

        JacobianPoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Compute `P + Q`.
    ///
    /// Adding a point to itself doubles it and adding a point to its
    /// negation yields infinity.
    pub fn add(&self, p1: &JacobianPoint, p2: &JacobianPoint) -> JacobianPoint {
        if p1.is_identity() {
            return p2.clone();
        }
        if p2.is_identity() {
            return p1.clone();
        }

        let zz1 = self.square(&p1.z);
        let zz2 = self.square(&p2.z);

        let a = self.mul_mod(&p1.x, &zz2);
        let b = self.mul_mod(&p2.x, &zz1);
        let c = self.mul_mod(&self.mul_mod(&p1.y, &zz2), &p2.z);
        let d = self.mul_mod(&self.mul_mod(&p2.y, &zz1), &p1.z);

        let e = self.sub_mod(&a, &b);
        let f = self.sub_mod(&c, &d);

        if e.is_zero() {
            return if f.is_zero() {
                self.double(p1)
            } else {
                JacobianPoint::identity()
            };
        }

        let ee = self.square(&e);
        let eee = self.mul_mod(&ee, &e);
        let bee = self.mul_mod(&b, &ee);

        let x3 = self.sub_mod(
            &self.sub_mod(&self.square(&f), &eee),
            &self.add_mod(&bee, &bee),
        );
        let y3 = self.sub_mod(
            &self.mul_mod(&f, &self.sub_mod(&bee, &x3)),
            &self.mul_mod(&d, &eee),
        );
        let z3 = self.mul_mod(&self.mul_mod(&p1.z, &p2.z), &e);

        JacobianPoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Compute `-P`.
    pub fn negate(&self, point: &JacobianPoint) -> JacobianPoint {
        if point.is_identity() {
            return JacobianPoint::identity();
        }

        JacobianPoint {
            x: point.x.clone(),
            y: self.sub_mod(&BigUint::zero(), &point.y),
            z: point.z.clone(),
        }
    }

    /// Compute `-P` for an affine point.
    pub fn negate_affine(&self, point: &AffinePoint) -> AffinePoint {
        if point.infinity {
            return AffinePoint::identity();
        }

        AffinePoint::new(point.x.clone(), self.sub_mod(&BigUint::zero(), &point.y))
    }

    /// Convert to affine coordinates.
    pub fn to_affine(&self, point: &JacobianPoint) -> AffinePoint {
        if point.is_identity() {
            return AffinePoint::identity();
        }

        if point.is_affine() {
            return AffinePoint::new(point.x.clone(), point.y.clone());
        }

        let Some(zinv) = point.z.modinv(&self.p) else {
            return AffinePoint::identity();
        };
        let zinv2 = self.square(&zinv);
        let zinv3 = self.mul_mod(&zinv2, &zinv);

        AffinePoint::new(
            self.mul_mod(&point.x, &zinv2),
            self.mul_mod(&point.y, &zinv3),
        )
    }
}

impl Debug for ShortWeierstrassCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortWeierstrassCurve")
            .field("p", &format_args!("{:X}", self.p))
            .field("a", &format_args!("{:X}", self.a))
            .field("b", &format_args!("{:X}", self.b))
            .finish()
    }
}
