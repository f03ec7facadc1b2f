//! Prime-field short Weierstrass elliptic curves with runtime domain
//! parameters.
//!
//! Curves are of the form `y² = x³ + ax + b (mod p)`. Field elements and
//! scalars are arbitrary-precision [`BigUint`] values, which allows domain
//! parameters to be selected at runtime rather than fixed at compile time.
//!
//! ## Arithmetic
//!
//! [`ShortWeierstrassCurve`] implements the group law on [`JacobianPoint`]s,
//! conversion back to [`AffinePoint`], point validation, and square roots
//! for point decompression. Scalar multiplication comes in two forms:
//!
//! - [`ShortWeierstrassCurve::mul`]: `k·P`, with the scalar split into two
//!   random shares which are recoded in non-adjacent form and walked
//!   together.
//! - [`ShortWeierstrassCurve::mul_add`]: `k·P + m·S` using Shamir's trick.
//!
//! ## ⚠️ Security Warning
//!
//! Big integer arithmetic is not constant time. Only the scalar
//! multiplication entry points blind the secret scalar; everything else
//! is best effort.

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

mod affine;
mod curve;
mod encoding;
mod error;
mod jacobian;
mod mul;
mod naf;
mod params;
mod random;
mod secret;
mod sqrt;

pub use crate::{
    affine::AffinePoint,
    curve::ShortWeierstrassCurve,
    encoding::{PointFormat, int_to_bytes},
    error::{Error, Result},
    jacobian::JacobianPoint,
    params::{CurveDescription, EcKeyPair, EcParameter, KeyParameters},
    random::random_in_range,
    secret::{SecretScalar, wipe},
};
pub use num_bigint::{self, BigInt, BigUint};
pub use rand_core;
