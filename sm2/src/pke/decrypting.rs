//! Support for SM2 decryption.
//!
//! ## Algorithm
//!
//! ```text
//! B1: get C1 from C and verify that C1 satisfies the elliptic curve equation
//! B2: compute point S = [h]C1, output an error if S is the point at infinity
//! B3: compute [dB]C1 = (x2, y2)
//! B4: compute t = KDF(x2 || y2, klen)
//! B5: get C2 from C and compute M' = C2 xor t
//! B6: compute u = Hash(x2 || M' || y2), output an error if u != C3
//! B7: output the plaintext M'
//! ```

use super::{Cipher, Mode, encrypting::coordinates};
use crate::{DeriveBytes, Error, Result, Sm2};
use rand_core::CryptoRngCore;
use sm3::digest::{Digest, FixedOutputReset, Output};
use subtle::ConstantTimeEq;
use weierstrass::JacobianPoint;
use zeroize::{Zeroize, Zeroizing};

impl<D, R> Sm2<D, R>
where
    D: Digest + FixedOutputReset,
    R: CryptoRngCore,
{
    /// Decrypt a ciphertext with the loaded private key.
    pub fn decrypt_message(&self, cipher: &Cipher<D>) -> Result<Vec<u8>> {
        let d = self.secret()?;
        let c1 = cipher.c1();

        // B1: verify that C1 satisfies the elliptic curve equation
        self.params().curve().validate_point(c1)?;

        // B2: compute point S = [h]C1
        if self.in_small_subgroup(c1) {
            return Err(Error::SmallSubgroup);
        }

        // B3: compute [dB]C1 = (x2, y2)
        let mut shared = self.mul(d, &JacobianPoint::from(c1));
        let (x2, y2) = coordinates(&shared, self.params().coordinate_len())?;
        shared.zeroize();

        // B4: compute t = KDF(x2 || y2, klen)
        // B5: get C2 from C and compute M' = C2 xor t
        let mut msg = cipher.c2().to_vec();
        let z = Zeroizing::new([x2.as_slice(), y2.as_slice()].concat());
        DeriveBytes::<D>::new(&z).apply_keystream(&mut msg);

        // B6: compute u = Hash(x2 || M' || y2)
        let u = Self::digest([x2.as_slice(), msg.as_slice(), y2.as_slice()]);

        // If u != C3, output "ERROR" and exit
        if !bool::from(u.as_slice().ct_eq(cipher.c3().as_slice())) {
            msg.zeroize();
            return Err(Error::DecryptionFailed);
        }

        // B7: output the plaintext M'
        Ok(msg)
    }

    /// Decrypt a `C1 || C3 || C2` ciphertext.
    pub fn decrypt_data(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.decrypt_data_with(ciphertext, Mode::default())
    }

    /// Decrypt a ciphertext with the given component order. `C1` may use any
    /// point format.
    pub fn decrypt_data_with(&self, ciphertext: &[u8], mode: Mode) -> Result<Vec<u8>> {
        self.secret()?;
        let cipher = self.parse_cipher(ciphertext, mode)?;
        self.decrypt_message(&cipher)
    }

    /// Split a serialized ciphertext into its components.
    pub fn parse_cipher(&self, ciphertext: &[u8], mode: Mode) -> Result<Cipher<D>> {
        // B1: get C1 from C
        let (c1, consumed) = self.decode_point(ciphertext)?;
        let rest = &ciphertext[consumed..];

        let digest_size = <D as Digest>::output_size();
        if rest.len() < digest_size {
            return Err(Error::InvalidLength);
        }

        let (c2, c3) = match mode {
            Mode::C1C3C2 => {
                let (c3, c2) = rest.split_at(digest_size);
                (c2, c3)
            }
            Mode::C1C2C3 => rest.split_at(rest.len() - digest_size),
        };

        Ok(Cipher::new(c1, c2.to_vec(), Output::<D>::clone_from_slice(c3)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use weierstrass::PointFormat;

    #[test]
    fn decryption_needs_private_key() {
        let mut sm2 = Sm2::new();
        let pair = sm2.generate_key_pair();
        let ciphertext = sm2.encrypt_data(b"msg").expect("public key loaded");

        let mut public_only = Sm2::new();
        public_only.import_public_key(&pair.q).expect("valid point");
        let err = public_only.decrypt_data(&ciphertext).expect_err("no private key");
        assert_eq!(err, Error::MissingPrivateKey);
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[test]
    fn truncated_ciphertext() {
        let mut sm2 = Sm2::new();
        sm2.generate_key_pair();
        let ciphertext = sm2
            .encrypt_data_with(b"", PointFormat::Uncompressed, Mode::C1C2C3)
            .expect("public key loaded");

        let err = sm2
            .decrypt_data_with(&ciphertext[..ciphertext.len() - 1], Mode::C1C2C3)
            .expect_err("digest cut short");
        assert_eq!(err, Error::InvalidLength);
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        assert_eq!(
            sm2.decrypt_data(&ciphertext[..10]),
            Err(Error::Curve(weierstrass::Error::TooShort))
        );
    }

    #[test]
    fn modes_are_not_interchangeable() {
        let mut sm2 = Sm2::new();
        sm2.generate_key_pair();
        let ciphertext = sm2
            .encrypt_data_with(b"mode matters", PointFormat::Hybrid, Mode::C1C2C3)
            .expect("public key loaded");

        assert_eq!(
            sm2.decrypt_data_with(&ciphertext, Mode::C1C3C2),
            Err(Error::DecryptionFailed)
        );
        assert_eq!(
            sm2.decrypt_data_with(&ciphertext, Mode::C1C2C3).as_deref(),
            Ok(&b"mode matters"[..])
        );
    }
}
