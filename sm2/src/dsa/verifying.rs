//! Support for verifying SM2DSA signatures.
//!
//! ## Algorithm
//!
//! ```text
//! B1: verify whether r' in [1,n-1], verification failed if not
//! B2: verify whether s' in [1,n-1], verification failed if not
//! B3: set M'~=ZA || M'
//! B4: calculate e'=Hv(M'~)
//! B5: calculate t = (r' + s') modn, verification failed if t=0
//! B6: calculate the point (x1', y1')=[s']G + [t]PA
//! B7: calculate R=(e'+x1') modn, verification pass if yes, otherwise failed
//! ```

#![allow(non_snake_case)]

use super::Signature;
use crate::{Result, Sm2};
use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::CryptoRngCore;
use signature::{Error, Verifier};
use sm3::digest::{Digest, FixedOutputReset};
use weierstrass::JacobianPoint;

impl<D, R> Sm2<D, R>
where
    D: Digest + FixedOutputReset,
    R: CryptoRngCore,
{
    /// Verify the signature `(r, s)` over the message representative `e`.
    ///
    /// Fails only if no public key is loaded; an invalid signature yields
    /// `Ok(false)`.
    pub fn verify_hash(&self, r: &BigUint, s: &BigUint, e: &BigUint) -> Result<bool> {
        let Q = JacobianPoint::from(self.public()?);
        let n = self.params().order();

        // B1: verify whether r' in [1,n-1], verification failed if not
        // B2: verify whether s' in [1,n-1], verification failed if not
        if r.is_zero() || s.is_zero() || r >= n || s >= n {
            return Ok(false);
        }

        // B5: calculate t = (r' + s') modn, verification failed if t=0
        let t = (r + s) % n;
        if t.is_zero() {
            return Ok(false);
        }

        // B6: calculate the point (x1', y1')=[s']G + [t]PA
        let G = JacobianPoint::from(self.params().generator());
        let point = self.mul_add(s, &G, &t, &Q);
        let Some(x1) = point.x() else {
            return Ok(false);
        };

        // B7: calculate R=(e'+x1') modn, verification pass if yes, otherwise failed
        Ok(&((e + x1) % n) == r)
    }

    /// Verify a serialized `r || s` signature over `msg`.
    ///
    /// A signature of the wrong length is rejected before any other check.
    pub fn verify_data(&self, signature: &[u8], msg: &[u8]) -> Result<bool> {
        let width = self.params().scalar_len();
        if signature.len() != 2 * width {
            return Ok(false);
        }

        let r = BigUint::from_bytes_be(&signature[..width]);
        let s = BigUint::from_bytes_be(&signature[width..]);

        // B3: set M'~=ZA || M'
        // B4: calculate e'=Hv(M'~)
        let e = BigUint::from_bytes_be(&self.hash_msg(msg)?);
        self.verify_hash(&r, &s, &e)
    }
}

impl<D, R> Verifier<Signature> for Sm2<D, R>
where
    D: Digest + FixedOutputReset,
    R: CryptoRngCore,
{
    fn verify(&self, msg: &[u8], signature: &Signature) -> signature::Result<()> {
        if self.verify_data(signature.as_ref(), msg)? {
            Ok(())
        } else {
            Err(Error::new())
        }
    }
}
