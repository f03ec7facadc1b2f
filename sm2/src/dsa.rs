//! SM2 Digital Signature Algorithm (SM2DSA) as defined in [draft-shen-sm2-ecdsa § 5].
//!
//! ## Usage
//!
//! ```
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use sm2::{Sm2, dsa::{Signature, signature::{Signer, Verifier}}};
//!
//! // Signing
//! let mut signer = Sm2::new();
//! signer.set_distid(b"example@rustcrypto.org")?; // distinguishing identifier
//! let key_pair = signer.generate_key_pair();
//! let message = b"test message";
//! let signature: Signature = signer.sign(message);
//!
//! // Verifying
//! let mut verifier = Sm2::new();
//! verifier.set_distid(b"example@rustcrypto.org")?;
//! verifier.import_public_key(&key_pair.q)?;
//! verifier.verify(message, &signature)?;
//! # Ok(())
//! # }
//! ```
//!
//! [draft-shen-sm2-ecdsa § 5]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#section-5

mod signing;
mod verifying;

pub use signature;

use core::fmt::{self, Debug};
use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use signature::{Error, Result, SignatureEncoding};
use sm3::digest::{Digest, FixedOutputReset, Output};
use weierstrass::int_to_bytes;

use crate::Sm2;

/// SM2DSA signature: `r || s`, each a big endian integer as wide as the
/// group order.
#[derive(Clone, Eq, PartialEq)]
pub struct Signature {
    bytes: Box<[u8]>,
}

impl Signature {
    /// Create a signature from its `r` and `s` components, each serialized
    /// with `width` bytes.
    pub fn from_scalars(r: &BigUint, s: &BigUint, width: usize) -> Self {
        let mut bytes = int_to_bytes(r, width);
        bytes.extend_from_slice(&int_to_bytes(s, width));
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// Parse an SM2DSA signature from a byte slice.
    ///
    /// The slice is split into two halves of equal width; whether that width
    /// matches a particular curve is checked on verification.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() || bytes.len() % 2 != 0 {
            return Err(Error::new());
        }

        Ok(Self {
            bytes: bytes.into(),
        })
    }

    /// Serialize this signature as bytes.
    pub fn to_bytes(&self) -> Box<[u8]> {
        self.bytes.clone()
    }

    /// Convert this signature into a byte vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Bytes for the `r` component of a signature.
    pub fn r_bytes(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() / 2]
    }

    /// Bytes for the `s` component of a signature.
    pub fn s_bytes(&self) -> &[u8] {
        &self.bytes[self.bytes.len() / 2..]
    }

    /// Get the `r` component of this signature.
    pub fn r(&self) -> BigUint {
        BigUint::from_bytes_be(self.r_bytes())
    }

    /// Get the `s` component of this signature.
    pub fn s(&self) -> BigUint {
        BigUint::from_bytes_be(self.s_bytes())
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sm2::dsa::Signature(")?;

        for byte in self.bytes.iter() {
            write!(f, "{:02X}", byte)?;
        }

        write!(f, ")")
    }
}

impl From<Signature> for Box<[u8]> {
    fn from(signature: Signature) -> Box<[u8]> {
        signature.bytes
    }
}

impl SignatureEncoding for Signature {
    type Repr = Box<[u8]>;

    fn to_bytes(&self) -> Self::Repr {
        self.bytes.clone()
    }

    fn encoded_len(&self) -> usize {
        self.bytes.len()
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Signature> {
        Signature::from_slice(bytes)
    }
}

impl<D, R> Sm2<D, R>
where
    D: Digest + FixedOutputReset,
    R: CryptoRngCore,
{
    /// `H(Z || M)`
    fn hash_msg(&self, msg: &[u8]) -> crate::Result<Output<D>> {
        let z = self.z_value()?;
        Ok(Self::digest([z.as_slice(), msg]))
    }
}
