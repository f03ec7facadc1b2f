//! Support for SM2DSA signing.
//!
//! ## Algorithm
//!
//! ```text
//! A1: set M~=ZA || M
//! A2: calculate e=Hv(M~)
//! A3: pick a random number k in [1, n-1] via a random number generator
//! A4: calculate the elliptic curve point (x1, y1)=[k]G
//! A5: calculate r=(e+x1) modn, return to A3 if r=0 or r+k=n
//! A6: calculate s=((1+dA)^(-1)*(k-r*dA)) modn, return to A3 if s=0
//! A7: the digital signature of M is (r, s)
//! ```
//!
//! `k` is drawn from `[2^(11·l/16), n - 2^(11·l/16))` rather than the full
//! range, where `l` is the bit length of `n`.

#![allow(non_snake_case)]

use super::Signature;
use crate::{Error, Result, Sm2};
use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::CryptoRngCore;
use signature::Signer;
use sm3::digest::{Digest, FixedOutputReset};
use weierstrass::{JacobianPoint, wipe};

impl<D, R> Sm2<D, R>
where
    D: Digest + FixedOutputReset,
    R: CryptoRngCore,
{
    /// Sign the message representative `e`, returning `(r, s)`.
    pub fn sign_hash(&self, e: &BigUint) -> Result<(BigUint, BigUint)> {
        let d = self.secret()?;
        let n = self.params().order();
        let G = JacobianPoint::from(self.params().generator());

        let mut inv = (d + 1u32).modinv(n).ok_or(Error::InvalidPrivateKey)?;

        loop {
            // A3: pick a random number k
            let k = self.random_scalar();

            // A4: calculate the elliptic curve point (x1, y1)=[k]G
            let kG = self.mul(k.expose(), &G);
            let x1 = kG.x().ok_or(Error::Curve(weierstrass::Error::PointAtInfinity))?;

            // A5: calculate r=(e+x1) modn, return to A3 if r=0 or r+k=n
            let r = (e + x1) % n;
            if r.is_zero() || &(&r + k.expose()) == n {
                continue;
            }

            // A6: calculate s=((1+dA)^(-1)*(k-r*dA)) modn, return to A3 if s=0
            let mut rd = (&r * d) % n;
            let mut k_rd = (k.expose() + n - &rd) % n;
            let s = (&inv * &k_rd) % n;
            wipe(&mut rd);
            wipe(&mut k_rd);

            if s.is_zero() {
                continue;
            }

            wipe(&mut inv);

            // A7: the digital signature of M is (r, s)
            return Ok((r, s));
        }
    }

    /// Sign `msg` with the loaded private key and identifier.
    pub fn sign_data(&self, msg: &[u8]) -> Result<Signature> {
        self.secret()?;

        // A1: set M~=ZA || M
        // A2: calculate e=Hv(M~)
        let e = BigUint::from_bytes_be(&self.hash_msg(msg)?);
        let (r, s) = self.sign_hash(&e)?;
        Ok(Signature::from_scalars(&r, &s, self.params().scalar_len()))
    }
}

impl<D, R> Signer<Signature> for Sm2<D, R>
where
    D: Digest + FixedOutputReset,
    R: CryptoRngCore,
{
    fn try_sign(&self, msg: &[u8]) -> signature::Result<Signature> {
        Ok(self.sign_data(msg)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    #[test]
    fn signing_needs_private_key() {
        let mut sm2 = Sm2::new();
        assert_eq!(sm2.sign_data(b"msg"), Err(Error::MissingPrivateKey));
        assert_eq!(sm2.sign_hash(&BigUint::one()), Err(Error::MissingPrivateKey));

        let pair = sm2.generate_key_pair();
        let mut public_only = Sm2::new();
        public_only.import_public_key(&pair.q).expect("valid point");
        assert_eq!(public_only.sign_data(b"msg"), Err(Error::MissingPrivateKey));
        assert!(public_only.try_sign(b"msg").is_err());
    }
}
