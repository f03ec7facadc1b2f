//! Error types.

use core::fmt::{self, Display};

/// Curve arithmetic, encoding and parameter errors.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Point does not satisfy the curve equation.
    PointNotOnCurve,

    /// Operation is undefined for the point at infinity.
    PointAtInfinity,

    /// Value is not a quadratic residue modulo `p`.
    NonResidue,

    /// Tonelli-Shanks made no progress.
    SqrtFailed,

    /// Unknown point tag or coordinate out of range.
    InvalidEncoding,

    /// Encoding ended before all coordinates were read.
    TooShort,

    /// Curve is not a prime-field short Weierstrass curve.
    UnsupportedCurve,

    /// Malformed domain parameters.
    InvalidParameter,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::PointNotOnCurve => "point is not on the curve",
            Error::PointAtInfinity => "point at infinity",
            Error::NonResidue => "value has no square root",
            Error::SqrtFailed => "square root computation failed",
            Error::InvalidEncoding => "invalid point encoding",
            Error::TooShort => "point encoding too short",
            Error::UnsupportedCurve => "unsupported curve type",
            Error::InvalidParameter => "invalid domain parameters",
        })
    }
}

impl std::error::Error for Error {}

/// Result type.
pub type Result<T> = core::result::Result<T, Error>;
