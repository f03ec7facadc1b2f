//! Distinguished identifier support.

use sm3::digest::{Digest, Output};
use weierstrass::{AffinePoint, EcParameter, int_to_bytes};

use crate::{Error, MAX_DISTID_LEN, Result};

/// Compute user information hash `Z` according to [draft-shen-sm2-ecdsa § 5.1.4.4].
///
/// ```text
/// ZA=H256(ENTLA || IDA || a || b || xG || yG || xA || yA)
/// ```
///
/// Every field element is padded to the coordinate length of `params`.
///
/// [draft-shen-sm2-ecdsa § 5.1.4.4]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#section-5.1.4.4
pub fn hash_z<D: Digest>(
    params: &EcParameter,
    distid: &[u8],
    public_key: &AffinePoint,
) -> Result<Output<D>> {
    let (Some(xa), Some(ya)) = (public_key.x(), public_key.y()) else {
        return Err(Error::MissingPublicKey);
    };

    if distid.len() > MAX_DISTID_LEN {
        return Err(Error::IdentityTooLong);
    }
    let entla = u16::try_from(distid.len() * 8).map_err(|_| Error::IdentityTooLong)?;

    let len = params.coordinate_len();
    let curve = params.curve();
    let g = params.generator();

    let mut hasher = D::new();
    hasher.update(entla.to_be_bytes());
    hasher.update(distid);
    hasher.update(int_to_bytes(curve.a(), len));
    hasher.update(int_to_bytes(curve.b(), len));
    for coordinate in [g.x(), g.y()].into_iter().flatten() {
        hasher.update(int_to_bytes(coordinate, len));
    }
    hasher.update(int_to_bytes(xa, len));
    hasher.update(int_to_bytes(ya, len));
    Ok(hasher.finalize())
}
