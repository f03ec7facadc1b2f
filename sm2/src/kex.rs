//! SM2 Key Exchange Protocol as defined in [draft-shen-sm2-ecdsa § 6].
//!
//! ## Usage
//!
//! ```
//! # fn example() -> Result<(), sm2::Error> {
//! use sm2::Sm2;
//!
//! let mut alice = Sm2::new();
//! alice.set_distid(b"alice@example.org")?;
//! alice.generate_key_pair();
//!
//! let mut bob = Sm2::new();
//! bob.set_distid(b"bob@example.org")?;
//! bob.generate_key_pair();
//!
//! // A1-A3 / B1-B3: each side picks an ephemeral key and sends `R` to its peer
//! let initiator = alice.start_key_exchange(false)?;
//! let responder = bob.start_key_exchange(true)?;
//! let (ra, rb) = (initiator.r_point().clone(), responder.r_point().clone());
//!
//! let bob_key = responder
//!     .derive_key(alice.public_key(), &ra, b"alice@example.org")?
//!     .expect("shared point is finite");
//! let mut alice_key = initiator
//!     .derive_key(bob.public_key(), &rb, b"bob@example.org")?
//!     .expect("shared point is finite");
//!
//! // Both sides check the confirmation tag sent by their peer
//! assert!(alice_key.verify_peer(bob_key.confirmation()));
//! assert!(bob_key.verify_peer(alice_key.confirmation()));
//! let key = alice_key.derive(16);
//! # Ok(())
//! # }
//! ```
//!
//! ## Algorithm
//!
//! ```text
//! A1: pick rA in [1, n-1] and compute RA = [rA]G = (x1, y1)
//! A4: compute x1~ = 2^w + (x1 & (2^w - 1)), w = ceil(ceil(log2(n)) / 2) - 1
//! A5: compute tA = (dA + x1~ * rA) mod n
//! A6: verify RB satisfies the curve equation and compute x2~ = 2^w + (x2 & (2^w - 1))
//! A7: compute U = [h * tA](PB + [x2~]RB) = (xU, yU), fail if U is the point at infinity
//! A8: compute KA = KDF(xU || yU || ZA || ZB, klen)
//! A9: compute S1 = Hash(0x02 || yU || Hash(xU || ZA || ZB || x1 || y1 || x2 || y2)), check S1 = SB
//! A10: compute SA = Hash(0x03 || yU || Hash(xU || ZA || ZB || x1 || y1 || x2 || y2))
//! ```
//!
//! The responder runs the same steps with the roles of `A` and `B` swapped
//! in the keys, but `ZA`, `RA` are always the initiator's values.
//!
//! [draft-shen-sm2-ecdsa § 6]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#section-6

#![allow(non_snake_case)]

use core::{
    fmt::{self, Debug},
    ops::Deref,
};

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use sm3::digest::{Digest, FixedOutputReset, Output, OutputSizeUser};
use subtle::ConstantTimeEq;
use weierstrass::{AffinePoint, JacobianPoint, SecretScalar, int_to_bytes, wipe};
use zeroize::{Zeroize, Zeroizing};

use crate::{DeriveBytes, Error, Result, Sm2, distid::hash_z};

/// One side of an SM2 key exchange.
///
/// Holds the ephemeral key pair `(r, R = [r]G)` and is consumed by
/// [`KeyExchange::derive_key`].
pub struct KeyExchange<'a, D: Digest, R> {
    sm2: &'a Sm2<D, R>,
    responder: bool,
    z: WipedOutput<D>,
    r: SecretScalar,
    r_point: AffinePoint,
}

impl<D, R> Sm2<D, R>
where
    D: Digest + FixedOutputReset,
    R: CryptoRngCore,
{
    /// Begin a key exchange with a fresh ephemeral key.
    ///
    /// `responder` selects the role; the initiator's identity and ephemeral
    /// point come first in every hash.
    pub fn start_key_exchange(&self, responder: bool) -> Result<KeyExchange<'_, D, R>> {
        self.secret()?;
        let r = self.random_scalar();
        self.key_exchange(r, responder)
    }

    /// Begin a key exchange with the given ephemeral scalar, which must lie
    /// in `[1, n-1]`.
    pub fn continue_key_exchange(
        &self,
        r: &BigUint,
        responder: bool,
    ) -> Result<KeyExchange<'_, D, R>> {
        self.secret()?;
        if r.is_zero() || r >= self.params().order() {
            return Err(Error::InvalidPrivateKey);
        }
        self.key_exchange(SecretScalar::new(r.clone()), responder)
    }

    fn key_exchange(&self, r: SecretScalar, responder: bool) -> Result<KeyExchange<'_, D, R>> {
        let z = WipedOutput(self.z_value()?.clone());

        // A2: compute RA = [rA]G = (x1, y1)
        let G = JacobianPoint::from(self.params().generator());
        let r_point = self.mul(r.expose(), &G);

        Ok(KeyExchange {
            sm2: self,
            responder,
            z,
            r,
            r_point,
        })
    }
}

impl<'a, D, R> KeyExchange<'a, D, R>
where
    D: Digest + FixedOutputReset,
    R: CryptoRngCore,
{
    /// Ephemeral public point `R` to send to the peer.
    pub fn r_point(&self) -> &AffinePoint {
        &self.r_point
    }

    /// Is this the responding side?
    pub fn is_responder(&self) -> bool {
        self.responder
    }

    /// Compute the shared key from the peer's static and ephemeral public
    /// points and identifier.
    ///
    /// Returns `Ok(None)` if the shared point is the point at infinity.
    pub fn derive_key(
        self,
        peer_q: &AffinePoint,
        peer_r: &AffinePoint,
        peer_distid: &[u8],
    ) -> Result<Option<KeyAgreement<D>>> {
        let sm2 = self.sm2;
        let params = sm2.params();
        let curve = params.curve();
        let n = params.order();
        let len = params.coordinate_len();

        // A6: verify RB satisfies the curve equation
        curve.validate_point(peer_q)?;
        curve.validate_point(peer_r)?;
        if sm2.in_small_subgroup(peer_q) {
            return Err(Error::SmallSubgroup);
        }

        let peer_z = hash_z::<D>(params, peer_distid, peer_q)?;
        let w = reduction_width(params.bits());

        // A4: compute x1~
        // A5: compute tA = (dA + x1~ * rA) mod n
        let own_x = point_x(&self.r_point)?;
        let mut xr = reduce_x(own_x, w) * self.r.expose();
        let mut t = (sm2.secret()? + &xr) % n;
        wipe(&mut xr);

        // A6: compute x2~
        let peer_x = reduce_x(point_x(peer_r)?, w);

        // A7: compute U = [h * tA](PB + [x2~]RB)
        let vi = sm2.mul_add(
            &BigUint::one(),
            &JacobianPoint::from(peer_q),
            &peer_x,
            &JacobianPoint::from(peer_r),
        );
        let mut ht = params.cofactor() * &t;
        let V = sm2.mul(&ht, &JacobianPoint::from(&vi));
        wipe(&mut t);
        wipe(&mut ht);

        let (Some(vx), Some(vy)) = (V.x(), V.y()) else {
            return Ok(None);
        };
        let vx = Zeroizing::new(int_to_bytes(vx, len));
        let vy = Zeroizing::new(int_to_bytes(vy, len));

        let (za, zb, ra, rb) = if self.responder {
            (&peer_z, &*self.z, peer_r, &self.r_point)
        } else {
            (&*self.z, &peer_z, &self.r_point, peer_r)
        };

        // A8: compute KA = KDF(xU || yU || ZA || ZB, klen)
        let material = Zeroizing::new([&vx[..], &vy[..], &za[..], &zb[..]].concat());
        let kdf = DeriveBytes::new(&material);

        // A9: compute S1 = Hash(0x02 || yU || Hash(xU || ZA || ZB || x1 || y1 || x2 || y2))
        // A10: compute SA = Hash(0x03 || yU || Hash(xU || ZA || ZB || x1 || y1 || x2 || y2))
        let ra = curve.encode_point(ra, weierstrass::PointFormat::Uncompressed)?;
        let rb = curve.encode_point(rb, weierstrass::PointFormat::Uncompressed)?;
        let si = Sm2::<D, R>::digest([&vx[..], &za[..], &zb[..], &ra[1..], &rb[1..]]);
        let sb = Sm2::<D, R>::digest([&[0x02][..], &vy[..], &si[..]]);
        let sa = Sm2::<D, R>::digest([&[0x03][..], &vy[..], &si[..]]);

        let (confirmation, peer_confirmation) = if self.responder {
            (sb, sa)
        } else {
            (sa, sb)
        };

        Ok(Some(KeyAgreement {
            kdf,
            confirmation: WipedOutput(confirmation),
            peer_confirmation: WipedOutput(peer_confirmation),
        }))
    }
}

impl<D: Digest, R> Debug for KeyExchange<'_, D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyExchange")
            .field("responder", &self.responder)
            .field("r_point", &self.r_point)
            .finish_non_exhaustive()
    }
}

/// Outcome of a key exchange: the shared key stream and the confirmation
/// tags exchanged in the optional third pass.
pub struct KeyAgreement<D: Digest + FixedOutputReset> {
    kdf: DeriveBytes<D>,
    confirmation: WipedOutput<D>,
    peer_confirmation: WipedOutput<D>,
}

impl<D: Digest + FixedOutputReset> KeyAgreement<D> {
    /// Derive the next `len` bytes of shared key material.
    pub fn derive(&mut self, len: usize) -> Zeroizing<Vec<u8>> {
        self.kdf.derive(len)
    }

    /// Fill `out` with the next bytes of shared key material.
    pub fn fill_bytes(&mut self, out: &mut [u8]) {
        self.kdf.fill_bytes(out);
    }

    /// Shared key stream.
    pub fn into_kdf(self) -> DeriveBytes<D> {
        self.kdf
    }

    /// Confirmation tag to send to the peer (`SB` for the responder, `SA`
    /// for the initiator).
    pub fn confirmation(&self) -> &Output<D> {
        &self.confirmation
    }

    /// Confirmation tag expected from the peer.
    pub fn peer_confirmation(&self) -> &Output<D> {
        &self.peer_confirmation
    }

    /// Check the tag received from the peer in constant time.
    pub fn verify_peer(&self, tag: &[u8]) -> bool {
        self.peer_confirmation.as_slice().ct_eq(tag).into()
    }
}

impl<D: Digest + FixedOutputReset> Debug for KeyAgreement<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyAgreement").finish_non_exhaustive()
    }
}

/// Digest output cleared on drop.
struct WipedOutput<D: OutputSizeUser>(Output<D>);

impl<D: OutputSizeUser> Deref for WipedOutput<D> {
    type Target = Output<D>;

    fn deref(&self) -> &Output<D> {
        &self.0
    }
}

impl<D: OutputSizeUser> Zeroize for WipedOutput<D> {
    fn zeroize(&mut self) {
        self.0.as_mut_slice().zeroize();
    }
}

impl<D: OutputSizeUser> Drop for WipedOutput<D> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// `w = ceil(bits / 2) - 1`
fn reduction_width(bits: u64) -> u64 {
    (bits >> 1) + (bits & 1) - 1
}

/// `x~ = 2^w + (x & (2^w - 1))`
fn reduce_x(x: &BigUint, w: u64) -> BigUint {
    let two_w = BigUint::one() << w;
    let mask = &two_w - 1u32;
    two_w + (x & mask)
}

fn point_x(point: &AffinePoint) -> Result<&BigUint> {
    point
        .x()
        .ok_or(Error::Curve(weierstrass::Error::PointAtInfinity))
}
