//! Point encodings.
//!
//! ```text
//! 0x02 | 0x03   compressed    tag ‖ X          (tag & 1 = Y parity)
//! 0x04          uncompressed  tag ‖ X ‖ Y
//! 0x06 | 0x07   hybrid        tag ‖ X ‖ Y      (tag & 1 = Y parity)
//! ```
//!
//! Coordinates are big endian and padded to the byte length of `p`.

use num_bigint::BigUint;
use num_integer::Integer;
use rand_core::CryptoRngCore;

use crate::{AffinePoint, Error, Result, ShortWeierstrassCurve};

/// Serialization format for curve points.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PointFormat {
    /// X coordinate and the parity of Y.
    Compressed,

    /// Both coordinates.
    #[default]
    Uncompressed,

    /// Both coordinates plus the parity of Y in the tag.
    Hybrid,
}

impl PointFormat {
    /// Length of an encoded point given the coordinate length.
    pub fn encoded_len(self, coordinate_len: usize) -> usize {
        match self {
            PointFormat::Compressed => 1 + coordinate_len,
            PointFormat::Uncompressed | PointFormat::Hybrid => 1 + 2 * coordinate_len,
        }
    }
}

/// Serialize `x` as a `len`-byte big endian integer.
///
/// Values wider than `len` bytes keep only their low-order bytes.
pub fn int_to_bytes(x: &BigUint, len: usize) -> Vec<u8> {
    let bytes = x.to_bytes_be();
    let mut out = vec![0u8; len];

    if bytes.len() >= len {
        out.copy_from_slice(&bytes[bytes.len() - len..]);
    } else {
        out[len - bytes.len()..].copy_from_slice(&bytes);
    }

    out
}

impl ShortWeierstrassCurve {
    /// Serialize `point` in the given format.
    pub fn encode_point(&self, point: &AffinePoint, format: PointFormat) -> Result<Vec<u8>> {
        if point.infinity {
            return Err(Error::PointAtInfinity);
        }

        let len = self.coordinate_len();
        let parity = u8::from(point.y.is_odd());
        let mut out = Vec::with_capacity(format.encoded_len(len));

        match format {
            PointFormat::Compressed => {
                out.push(0x02 | parity);
                out.extend_from_slice(&int_to_bytes(&point.x, len));
            }
            PointFormat::Uncompressed | PointFormat::Hybrid => {
                out.push(if format == PointFormat::Hybrid {
                    0x06 | parity
                } else {
                    0x04
                });
                out.extend_from_slice(&int_to_bytes(&point.x, len));
                out.extend_from_slice(&int_to_bytes(&point.y, len));
            }
        }

        Ok(out)
    }

    /// Parse a point from the front of `bytes`.
    ///
    /// Returns the point and the number of bytes consumed. Compressed
    /// points are decompressed, uncompressed points are checked against the
    /// curve equation and hybrid points must agree with the decompressed Y.
    pub fn decode_point<R>(&self, bytes: &[u8], rng: &mut R) -> Result<(AffinePoint, usize)>
    where
        R: CryptoRngCore + ?Sized,
    {
        let len = self.coordinate_len();
        let (&tag, rest) = bytes.split_first().ok_or(Error::TooShort)?;
        if rest.len() < len {
            return Err(Error::TooShort);
        }

        let x = BigUint::from_bytes_be(&rest[..len]);
        if &x >= self.p() {
            return Err(Error::InvalidEncoding);
        }

        match tag {
            0x02 | 0x03 => {
                let y = self
                    .solve_y(&x, tag == 0x03, rng)
                    .map_err(|_| Error::PointNotOnCurve)?;
                Ok((AffinePoint::new(x, y), 1 + len))
            }
            0x04 | 0x06 | 0x07 => {
                if rest.len() < 2 * len {
                    return Err(Error::TooShort);
                }

                let y = BigUint::from_bytes_be(&rest[len..2 * len]);
                if &y >= self.p() {
                    return Err(Error::InvalidEncoding);
                }

                if tag == 0x04 {
                    let point = AffinePoint::new(x, y);
                    self.validate_point(&point)?;
                    return Ok((point, 1 + 2 * len));
                }

                let solved = self
                    .solve_y(&x, tag == 0x07, rng)
                    .map_err(|_| Error::PointNotOnCurve)?;
                if solved != y {
                    return Err(Error::PointNotOnCurve);
                }

                Ok((AffinePoint::new(x, y), 1 + 2 * len))
            }
            _ => Err(Error::InvalidEncoding),
        }
    }
}
