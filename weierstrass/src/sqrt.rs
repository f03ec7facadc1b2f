//! Square roots modulo `p` for point decompression.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;

use crate::{Error, Result, ShortWeierstrassCurve, random::random_in_range};

impl ShortWeierstrassCurve {
    /// Euler's criterion: is `x` a square modulo `p`?
    pub fn is_quadratic_residue(&self, x: &BigUint) -> bool {
        let x = x % self.p();
        x.is_zero() || x.modpow(&self.euler, self.p()).is_one()
    }

    /// Compute a square root of `x` modulo `p` with Tonelli-Shanks.
    ///
    /// The quadratic non-residue the algorithm needs is found by sampling
    /// `[1, p)` at random.
    pub fn sqrt<R>(&self, x: &BigUint, rng: &mut R) -> Result<BigUint>
    where
        R: CryptoRngCore + ?Sized,
    {
        let p = self.p();
        let x = x % p;
        if x.is_zero() {
            return Ok(BigUint::zero());
        }

        if !self.is_quadratic_residue(&x) {
            return Err(Error::NonResidue);
        }

        let one = BigUint::one();
        let z = loop {
            let z = random_in_range(rng, &one, p);
            if !z.modpow(&self.euler, p).is_one() {
                break z;
            }
        };

        // p - 1 = q·2^s with q odd
        let mut q = self.euler.clone();
        let mut s = 1u32;
        while q.is_even() {
            q >>= 1;
            s += 1;
        }

        let mut m = s;
        let mut c = z.modpow(&q, p);
        let mut t = x.modpow(&q, p);
        let mut r = x.modpow(&((&q + 1u32) >> 1), p);

        loop {
            if t.is_zero() {
                return Ok(BigUint::zero());
            }
            if t.is_one() {
                return Ok(r);
            }

            // least i in [1, m) with t^(2^i) = 1
            let mut i = 1;
            let mut t2i = self.square(&t);
            while !t2i.is_one() {
                i += 1;
                if i >= m {
                    return Err(Error::SqrtFailed);
                }
                t2i = self.square(&t2i);
            }

            let mut b = c;
            for _ in 0..(m - i - 1) {
                b = self.square(&b);
            }

            m = i;
            c = self.square(&b);
            t = self.mul_mod(&t, &c);
            r = self.mul_mod(&r, &b);
        }
    }

    /// Solve the curve equation for `y` given `x`.
    ///
    /// Returns the root whose least significant bit matches `lsb_set`. When
    /// `x³ + ax + b = 0` the only root is zero, whatever the requested
    /// parity.
    pub fn solve_y<R>(&self, x: &BigUint, lsb_set: bool, rng: &mut R) -> Result<BigUint>
    where
        R: CryptoRngCore + ?Sized,
    {
        let y = self.sqrt(&self.rhs(x), rng)?;
        if !y.is_zero() && lsb_set == y.is_even() {
            Ok(self.p() - y)
        } else {
            Ok(y)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{AffinePoint, Error, curve::tests::*};
    use hex_literal::hex;
    use num_bigint::BigUint;
    use num_integer::Integer;
    use rand_core::OsRng;

    use super::*;

    #[test]
    fn every_residue_mod_97() {
        // 97 - 1 = 3·2^5 exercises the full Tonelli-Shanks loop
        let curve = toy_curve();
        let p = curve.p();

        for x in 0u32..97 {
            let x = BigUint::from(x);
            match curve.sqrt(&x, &mut OsRng) {
                Ok(r) => assert_eq!(&r * &r % p, x),
                Err(e) => {
                    assert_eq!(e, Error::NonResidue);
                    assert!(!curve.is_quadratic_residue(&x));
                }
            }
        }
    }

    #[test]
    fn solve_y_parity() {
        let curve = toy_curve();

        for point in toy_points(&curve) {
            let lsb = point.y.is_odd();
            let y = curve.solve_y(&point.x, lsb, &mut OsRng).expect("on curve");
            assert_eq!(y, point.y);
        }
    }

    #[test]
    fn p_congruent_3_mod_4() {
        // SM2 field prime, p ≡ 3 (mod 4)
        let p = BigUint::from_bytes_be(&hex!(
            "FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF00000000FFFFFFFFFFFFFFFF"
        ));
        let a = &p - 3u32;
        let b = BigUint::from_bytes_be(&hex!(
            "28E9FA9E9D9F5E344D5A9E4BCF6509A7F39789F515AB8F92DDBCBD414D940E93"
        ));
        let gx = BigUint::from_bytes_be(&hex!(
            "32C4AE2C1F1981195F9904466A39C9948FE30BBFF2660BE1715A4589334C74C7"
        ));
        let gy = BigUint::from_bytes_be(&hex!(
            "BC3736A2F4F6779C59BDCEE36B692153D0A9877CC62A474002DF32E52139F0A0"
        ));
        let curve = ShortWeierstrassCurve::new(p, a, b).expect("valid parameters");

        let y = curve.solve_y(&gx, gy.is_odd(), &mut OsRng).expect("on curve");
        assert_eq!(y, gy);
        assert!(curve.is_on_curve(&AffinePoint::new(gx.clone(), y)));

        let other = curve.solve_y(&gx, !gy.is_odd(), &mut OsRng).expect("on curve");
        assert_eq!(other, curve.p() - &gy);
    }
}
