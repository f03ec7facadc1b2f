//! Support for SM2 public key encryption.
//!
//! ## Algorithm
//!
//! ```text
//! A1: generate a random number k in [1, n-1] with the random number generator
//! A2: compute point C1 = [k]G = (x1, y1)
//! A3: compute point S = [h]PB of the elliptic curve, output an error if S is the point at infinity
//! A4: compute point [k]PB = (x2, y2)
//! A5: compute t = KDF(x2 || y2, klen), return to A1 if t is an all-zero bit string
//! A6: compute C2 = M xor t
//! A7: compute C3 = Hash(x2 || M || y2)
//! A8: output the ciphertext C = C1 || C3 || C2
//! ```

#![allow(non_snake_case)]

use super::{Cipher, Mode};
use crate::{DeriveBytes, Error, Result, Sm2};
use rand_core::CryptoRngCore;
use sm3::digest::{Digest, FixedOutputReset};
use weierstrass::{AffinePoint, JacobianPoint, PointFormat, int_to_bytes};
use zeroize::{Zeroize, Zeroizing};

impl<D, R> Sm2<D, R>
where
    D: Digest + FixedOutputReset,
    R: CryptoRngCore,
{
    /// Encrypt `msg` to the loaded public key.
    pub fn encrypt_message(&self, msg: &[u8]) -> Result<Cipher<D>> {
        let public = self.public()?;
        let G = JacobianPoint::from(self.params().generator());
        let PB = JacobianPoint::from(public);
        let len = self.params().coordinate_len();

        // A3: compute point S = [h]PB of the elliptic curve
        if self.in_small_subgroup(public) {
            return Err(Error::SmallSubgroup);
        }

        loop {
            // A1: generate a random number k
            let k = self.random_scalar();

            // A2: compute point C1 = [k]G = (x1, y1)
            let C1 = self.mul(k.expose(), &G);

            // A4: compute point [k]PB = (x2, y2)
            let mut shared = self.mul(k.expose(), &PB);
            let (x2, y2) = coordinates(&shared, len)?;
            shared.zeroize();

            // A5: compute t = KDF(x2 || y2, klen)
            let z = Zeroizing::new([x2.as_slice(), y2.as_slice()].concat());
            let t = DeriveBytes::<D>::new(&z).derive(msg.len());
            if !msg.is_empty() && t.iter().all(|&byte| byte == 0) {
                continue;
            }

            // A6: compute C2 = M xor t
            let c2 = msg.iter().zip(t.iter()).map(|(m, t)| m ^ t).collect();

            // A7: compute C3 = Hash(x2 || M || y2)
            let c3 = Self::digest([x2.as_slice(), msg, y2.as_slice()]);

            return Ok(Cipher::new(C1, c2, c3));
        }
    }

    /// Encrypt `msg`, serialized as `C1 || C3 || C2` with an uncompressed `C1`.
    pub fn encrypt_data(&self, msg: &[u8]) -> Result<Vec<u8>> {
        self.encrypt_data_with(msg, PointFormat::default(), Mode::default())
    }

    /// Encrypt `msg` with the given `C1` point format and component order.
    pub fn encrypt_data_with(
        &self,
        msg: &[u8],
        format: PointFormat,
        mode: Mode,
    ) -> Result<Vec<u8>> {
        // A8: output the ciphertext
        self.encrypt_message(msg)?
            .to_vec(self.params().curve(), format, mode)
    }
}

/// `(x2, y2)` as fixed-width big endian byte strings.
pub(super) fn coordinates(
    point: &AffinePoint,
    len: usize,
) -> Result<(Zeroizing<Vec<u8>>, Zeroizing<Vec<u8>>)> {
    match (point.x(), point.y()) {
        (Some(x), Some(y)) => Ok((
            Zeroizing::new(int_to_bytes(x, len)),
            Zeroizing::new(int_to_bytes(y, len)),
        )),
        _ => Err(Error::Curve(weierstrass::Error::PointAtInfinity)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encryption_needs_public_key() {
        let sm2 = Sm2::new();
        assert_eq!(sm2.encrypt_data(b"msg"), Err(Error::MissingPublicKey));
    }

    #[test]
    fn ciphertext_layout() {
        let mut sm2 = Sm2::new();
        sm2.generate_key_pair();
        let msg = b"encryption standard";

        let cipher = sm2.encrypt_message(msg).expect("public key loaded");
        assert_eq!(cipher.c2().len(), msg.len());
        assert_eq!(cipher.c3().len(), 32);

        let curve = sm2.params().curve();
        let c1 = sm2
            .encode_point(cipher.c1(), PointFormat::Uncompressed)
            .expect("finite point");
        let new = cipher
            .to_vec(curve, PointFormat::Uncompressed, Mode::C1C3C2)
            .expect("finite point");
        let old = cipher
            .to_vec(curve, PointFormat::Uncompressed, Mode::C1C2C3)
            .expect("finite point");

        assert_eq!(new.len(), 65 + 32 + msg.len());
        assert_eq!(new, [&c1[..], &cipher.c3()[..], cipher.c2()].concat());
        assert_eq!(old, [&c1[..], cipher.c2(), &cipher.c3()[..]].concat());

        let compressed = cipher
            .to_vec(curve, PointFormat::Compressed, Mode::C1C3C2)
            .expect("finite point");
        assert_eq!(compressed.len(), 33 + 32 + msg.len());
    }

    #[test]
    fn empty_message() {
        let mut sm2 = Sm2::new();
        sm2.generate_key_pair();

        let ciphertext = sm2.encrypt_data(b"").expect("public key loaded");
        assert_eq!(ciphertext.len(), 65 + 32);
    }
}
