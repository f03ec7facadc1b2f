//! SM2 Encryption Algorithm (SM2) as defined in [draft-shen-sm2-ecdsa § 5].
//!
//! ## Usage
//!
//! ```
//! # fn example() -> Result<(), sm2::Error> {
//! use sm2::{PointFormat, Sm2, pke::Mode};
//!
//! // Encrypting
//! let mut receiver = Sm2::new();
//! let key_pair = receiver.generate_key_pair();
//!
//! let mut sender = Sm2::new();
//! sender.import_public_key(&key_pair.q)?;
//! let plaintext = b"plaintext";
//! let ciphertext = sender.encrypt_data_with(plaintext, PointFormat::Compressed, Mode::C1C2C3)?;
//!
//! // Decrypting
//! let decrypted = receiver.decrypt_data_with(&ciphertext, Mode::C1C2C3)?;
//! assert_eq!(decrypted, plaintext);
//! # Ok(())
//! # }
//! ```
//!
//! [draft-shen-sm2-ecdsa § 5]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#section-5

mod decrypting;
mod encrypting;

use core::fmt::{self, Debug};
use sm3::digest::{Output, OutputSizeUser};
use weierstrass::{AffinePoint, PointFormat, ShortWeierstrassCurve};

use crate::Result;

/// Modes for the cipher encoding/decoding.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    /// old mode
    C1C2C3,
    /// new mode
    #[default]
    C1C3C2,
}

/// Ciphertext components.
///
/// - `c1`: the ephemeral point `[k]G`
/// - `c2`: the masked message
/// - `c3`: `H(x2 || M || y2)`
pub struct Cipher<D: OutputSizeUser> {
    c1: AffinePoint,
    c2: Vec<u8>,
    c3: Output<D>,
}

impl<D: OutputSizeUser> Cipher<D> {
    /// Assemble a ciphertext from its components.
    pub fn new(c1: AffinePoint, c2: Vec<u8>, c3: Output<D>) -> Self {
        Self { c1, c2, c3 }
    }

    /// Ephemeral point `C1`.
    pub fn c1(&self) -> &AffinePoint {
        &self.c1
    }

    /// Masked message `C2`.
    pub fn c2(&self) -> &[u8] {
        &self.c2
    }

    /// Message digest `C3`.
    pub fn c3(&self) -> &Output<D> {
        &self.c3
    }

    /// Serialize as `C1 || C3 || C2` or `C1 || C2 || C3`, with `C1` encoded
    /// in the given point format.
    pub fn to_vec(
        &self,
        curve: &ShortWeierstrassCurve,
        format: PointFormat,
        mode: Mode,
    ) -> Result<Vec<u8>> {
        let mut out = curve.encode_point(&self.c1, format)?;
        out.reserve(self.c2.len() + self.c3.len());

        match mode {
            Mode::C1C2C3 => {
                out.extend_from_slice(&self.c2);
                out.extend_from_slice(&self.c3);
            }
            Mode::C1C3C2 => {
                out.extend_from_slice(&self.c3);
                out.extend_from_slice(&self.c2);
            }
        }

        Ok(out)
    }
}

impl<D: OutputSizeUser> Clone for Cipher<D> {
    fn clone(&self) -> Self {
        Self {
            c1: self.c1.clone(),
            c2: self.c2.clone(),
            c3: self.c3.clone(),
        }
    }
}

impl<D: OutputSizeUser> Debug for Cipher<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cipher")
            .field("c1", &self.c1)
            .field("c2", &self.c2)
            .field("c3", &self.c3.as_slice())
            .finish()
    }
}

impl<D: OutputSizeUser> PartialEq for Cipher<D> {
    fn eq(&self, other: &Self) -> bool {
        self.c1 == other.c1 && self.c2 == other.c2 && self.c3 == other.c3
    }
}

impl<D: OutputSizeUser> Eq for Cipher<D> {}
