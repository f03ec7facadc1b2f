//! Error types.

use core::fmt::{self, Display};

/// SM2 errors.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Operation needs a private key and none is loaded.
    MissingPrivateKey,

    /// Operation needs a public key and none is loaded.
    MissingPublicKey,

    /// Key pair to import has neither a private nor a public key.
    MissingKey,

    /// Invalid point or curve parameters.
    Curve(weierstrass::Error),

    /// Point falls in a small subgroup (`[h]P = O`).
    SmallSubgroup,

    /// Ciphertext integrity check (C3) failed.
    DecryptionFailed,

    /// Distinguishing identifier longer than [`MAX_DISTID_LEN`][crate::MAX_DISTID_LEN].
    IdentityTooLong,

    /// Private key outside of `[1, n-2]`.
    InvalidPrivateKey,

    /// Input has the wrong length.
    InvalidLength,
}

/// Broad classification of an [`Error`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Required key material is missing.
    InvalidOperation,

    /// Invalid point, failed integrity check or bad key material.
    Cryptographic,

    /// Malformed input.
    InvalidArgument,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingPrivateKey | Error::MissingPublicKey | Error::MissingKey => {
                ErrorKind::InvalidOperation
            }
            Error::Curve(_)
            | Error::SmallSubgroup
            | Error::DecryptionFailed
            | Error::IdentityTooLong
            | Error::InvalidPrivateKey => ErrorKind::Cryptographic,
            Error::InvalidLength => ErrorKind::InvalidArgument,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingPrivateKey => f.write_str("no private key loaded"),
            Error::MissingPublicKey => f.write_str("no public key loaded"),
            Error::MissingKey => f.write_str("key pair has neither a private nor a public key"),
            Error::Curve(err) => write!(f, "curve error: {err}"),
            Error::SmallSubgroup => f.write_str("point is in a small subgroup"),
            Error::DecryptionFailed => f.write_str("decryption failed"),
            Error::IdentityTooLong => f.write_str("distinguishing identifier too long"),
            Error::InvalidPrivateKey => f.write_str("private key out of range"),
            Error::InvalidLength => f.write_str("invalid length"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Curve(err) => Some(err),
            _ => None,
        }
    }
}

impl From<weierstrass::Error> for Error {
    fn from(err: weierstrass::Error) -> Self {
        Error::Curve(err)
    }
}

#[cfg(feature = "dsa")]
impl From<Error> for signature::Error {
    fn from(err: Error) -> Self {
        signature::Error::from_source(err)
    }
}

/// Result type.
pub type Result<T> = core::result::Result<T, Error>;
