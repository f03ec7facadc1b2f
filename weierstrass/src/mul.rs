//! Scalar multiplication.
//!
//! Both ladders consume scalars recoded by [`naf::encode_into`], reading one
//! radix-4 digit per iteration: two doublings followed by one table
//! addition. Positions where both recoded streams are zero would skip the
//! addition and leak the digit pattern, so they are rewritten first in a
//! way that preserves the value of the sum.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;

use crate::{
    JacobianPoint, ShortWeierstrassCurve, naf,
    random::random_in_range,
    secret::wipe,
};

impl ShortWeierstrassCurve {
    /// Compute `k·P`.
    ///
    /// The scalar is split into random shares `k = k1 + ks` with `ks` drawn
    /// uniformly from `[1, k)`. Both shares are NAF encoded and folded
    /// through a single double-and-add ladder over the table
    /// `[O, P, 2P, 3P, 4P]`, so only their sum determines the result.
    pub fn mul<R>(&self, k: &BigUint, point: &JacobianPoint, rng: &mut R) -> JacobianPoint
    where
        R: CryptoRngCore + ?Sized,
    {
        if k.is_zero() || point.is_identity() {
            return JacobianPoint::identity();
        }

        if k.is_one() {
            return point.clone();
        }

        let mut ks = random_in_range(rng, &BigUint::one(), k);
        let mut k1 = k - &ks;

        let p2 = self.double(point);
        let p3 = self.add(&p2, point);
        let p4 = self.double(&p2);
        let lut = [JacobianPoint::identity(), point.clone(), p2, p3, p4];

        let ret = naf::with_scratch(|n1, n2| {
            naf::encode_into(&k1, n1);
            naf::encode_into(&ks, n2);

            let len = n1.len().max(n2.len());
            n1.resize(len, 0);
            n2.resize(len, 0);
            let top = len - 1;

            for i in 0..top {
                if naf::value(n1[i]) + naf::value(n2[i]) != 0 {
                    continue;
                }

                // Move 4 from digit i+1 of the blinding share into digit i.
                let next = n2[i + 1];
                if naf::value(next) > 0 {
                    n2[i + 1] = naf::pack(naf::hi(next), naf::lo(next) - 1);
                    n2[i] = naf::pack(naf::hi(n2[i]) + 2, naf::lo(n2[i]));
                } else {
                    n2[i + 1] = naf::pack(naf::hi(next), naf::lo(next) + 1);
                    n2[i] = naf::pack(naf::hi(n2[i]) - 2, naf::lo(n2[i]));
                }
            }

            let mut acc = self.select(&lut, naf::value(n1[top]) + naf::value(n2[top]));
            for i in (0..top).rev() {
                acc = self.double(&self.double(&acc));
                let c = naf::value(n1[i]) + naf::value(n2[i]);
                acc = self.add(&acc, &self.select(&lut, c));
            }
            acc
        });

        wipe(&mut ks);
        wipe(&mut k1);
        ret
    }

    /// Compute `k·P` for a signed scalar.
    pub fn mul_signed<R>(&self, k: &BigInt, point: &JacobianPoint, rng: &mut R) -> JacobianPoint
    where
        R: CryptoRngCore + ?Sized,
    {
        match k.sign() {
            Sign::Minus => self.mul(k.magnitude(), &self.negate(point), rng),
            _ => self.mul(k.magnitude(), point, rng),
        }
    }

    /// Compute `k·P + m·S` using Shamir's trick.
    ///
    /// Both scalars are NAF encoded to the same length and walked together
    /// over a 16 entry table indexed by `7·x + y - 1` for the radix-4 digit
    /// pair `(x, y)`. Zero or one scalars fall back to [`Self::mul`].
    pub fn mul_add<R>(
        &self,
        k: &BigUint,
        p: &JacobianPoint,
        m: &BigUint,
        s: &JacobianPoint,
        rng: &mut R,
    ) -> JacobianPoint
    where
        R: CryptoRngCore + ?Sized,
    {
        if k.is_zero() || p.is_identity() {
            return self.mul(m, s, rng);
        }
        if m.is_zero() || s.is_identity() {
            return self.mul(k, p, rng);
        }
        if k.is_one() {
            return self.add(p, &self.mul(m, s, rng));
        }
        if m.is_one() {
            return self.add(s, &self.mul(k, p, rng));
        }

        let lut = self.shamir_table(p, s);

        naf::with_scratch(|kk, mm| {
            naf::encode_into(k, kk);
            naf::encode_into(m, mm);

            let len = kk.len().max(mm.len());
            kk.resize(len, 0);
            mm.resize(len, 0);
            let top = len - 1;

            for i in 0..top {
                if naf::value(kk[i]) != 0 || naf::value(mm[i]) != 0 {
                    continue;
                }

                let next = naf::value(mm[i + 1]);
                if next == -1 || next == 2 {
                    mm[i + 1] = naf::pack_value(next - 1);
                    mm[i] = naf::pack_value(4);
                } else {
                    mm[i + 1] = naf::pack_value(next + 1);
                    mm[i] = naf::pack_value(-4);
                }
            }

            let mut acc = self.shamir_term(&lut, naf::value(kk[top]), naf::value(mm[top]));
            for i in (0..top).rev() {
                acc = self.double(&self.double(&acc));
                let term = self.shamir_term(&lut, naf::value(kk[i]), naf::value(mm[i]));
                acc = self.add(&acc, &term);
            }
            acc
        })
    }

    /// Compute `k·P + m·S` for signed scalars.
    pub fn mul_add_signed<R>(
        &self,
        k: &BigInt,
        p: &JacobianPoint,
        m: &BigInt,
        s: &JacobianPoint,
        rng: &mut R,
    ) -> JacobianPoint
    where
        R: CryptoRngCore + ?Sized,
    {
        let p = match k.sign() {
            Sign::Minus => self.negate(p),
            _ => p.clone(),
        };
        let s = match m.sign() {
            Sign::Minus => self.negate(s),
            _ => s.clone(),
        };
        self.mul_add(k.magnitude(), &p, m.magnitude(), &s, rng)
    }

    /// `lut[|c|]`, negated when `c < 0`.
    fn select(&self, lut: &[JacobianPoint; 5], c: i8) -> JacobianPoint {
        let entry = &lut[usize::from(c.unsigned_abs())];
        if c < 0 { self.negate(entry) } else { entry.clone() }
    }

    /// Precomputed `x·P + y·S` for every digit pair the Shamir ladder can
    /// produce. Slots 2, 9 and 10 are never selected.
    fn shamir_table(&self, p: &JacobianPoint, s: &JacobianPoint) -> [JacobianPoint; 16] {
        let s2 = self.double(s);
        let s4 = self.double(&s2);
        let p2 = self.double(p);
        let ns = self.negate(s);
        let ns2 = self.negate(&s2);
        let o = JacobianPoint::identity();

        [
            s.clone(),
            s2.clone(),
            o.clone(),
            s4,
            self.add(p, &ns2),
            self.add(p, &ns),
            p.clone(),
            self.add(p, s),
            self.add(p, &s2),
            o.clone(),
            o,
            self.add(&p2, &ns2),
            self.add(&p2, &ns),
            p2.clone(),
            self.add(&p2, s),
            self.add(&p2, &s2),
        ]
    }

    /// Table entry for the digit pair `(x, y)`, i.e. `x·P + y·S`.
    fn shamir_term(&self, lut: &[JacobianPoint; 16], x: i8, y: i8) -> JacobianPoint {
        let (index, negate) = match (x, y) {
            (0, 0) => return JacobianPoint::identity(),
            (0, y) if y > 0 => (y - 1, false),
            (0, y) => (-y - 1, true),
            (x, y) if x < 0 => (-7 * x - y - 1, true),
            (x, y) => (7 * x + y - 1, false),
        };

        let entry = &lut[usize::from(index.unsigned_abs())];
        if negate { self.negate(entry) } else { entry.clone() }
    }
}
