//! Pure Rust implementation of the SM2 public key cryptography suite
//! (GM/T 0003-2012).
//!
//! The [`Sm2`] context binds domain parameters, a hash function, a random
//! number generator, the signer's distinguishing identifier and a key pair,
//! and drives each of the three SM2 protocols:
//!
//! - [`dsa`]: SM2DSA digital signatures
//! - [`kex`]: SM2 authenticated key exchange
//! - [`pke`]: SM2 public key encryption
//!
//! Curve arithmetic is provided by the [`weierstrass`] crate.
//!
//! ## Usage
//!
#![cfg_attr(all(feature = "dsa", feature = "pke"), doc = "```")]
#![cfg_attr(not(all(feature = "dsa", feature = "pke")), doc = "```ignore")]
//! # fn example() -> Result<(), sm2::Error> {
//! use sm2::Sm2;
//!
//! let mut alice = Sm2::new();
//! alice.set_distid(b"alice@example.org")?;
//! alice.generate_key_pair();
//!
//! let signature = alice.sign_data(b"test message")?;
//! assert!(alice.verify_data(&signature.to_vec(), b"test message")?);
//!
//! let ciphertext = alice.encrypt_data(b"secret")?;
//! assert_eq!(alice.decrypt_data(&ciphertext)?, b"secret");
//! # Ok(())
//! # }
//! ```

#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::checked_conversions,
    clippy::implicit_saturating_sub,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

#[cfg(feature = "dsa")]
pub mod dsa;
#[cfg(feature = "kex")]
pub mod kex;
#[cfg(feature = "pke")]
pub mod pke;

mod arithmetic;
mod context;
mod distid;
mod error;
mod kdf;

pub use crate::{
    arithmetic::recommended_params,
    context::Sm2,
    distid::hash_z,
    error::{Error, ErrorKind, Result},
    kdf::DeriveBytes,
};
pub use sm3;
pub use weierstrass::{
    self, AffinePoint, BigUint, CurveDescription, EcKeyPair, EcParameter, KeyParameters,
    PointFormat, SecretScalar,
};

/// Maximum length of a distinguishing identifier in bytes: its length in
/// bits must fit the 16-bit `ENTL` field of the `Z` value.
pub const MAX_DISTID_LEN: usize = 8191;
