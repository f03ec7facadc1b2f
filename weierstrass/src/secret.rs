//! Zeroizing storage for secret scalars.

use core::fmt::{self, Debug};
use num_bigint::BigUint;
use num_traits::Zero;
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::encoding::int_to_bytes;

/// Overwrite the limbs backing `x` with zeroes.
///
/// `x` is zero afterwards. The allocation is kept and its contents are
/// overwritten in place.
pub fn wipe(x: &mut BigUint) {
    let limbs = x.iter_u32_digits().len();
    if limbs != 0 {
        x.assign_from_slice(&vec![0u32; limbs]);
    }
}

/// Secret scalar which is wiped when dropped.
#[derive(Clone, Default)]
pub struct SecretScalar(BigUint);

impl SecretScalar {
    /// Take ownership of `value`.
    pub fn new(value: BigUint) -> Self {
        Self(value)
    }

    /// Borrow the scalar.
    ///
    /// # ⚠️ Warning
    ///
    /// This value is key material.
    ///
    /// Please treat it with the care it deserves!
    pub fn expose(&self) -> &BigUint {
        &self.0
    }

    /// Is the scalar zero (i.e. absent)?
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Serialize as a `len`-byte big endian integer.
    pub fn to_bytes(&self, len: usize) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(int_to_bytes(&self.0, len))
    }
}

impl From<BigUint> for SecretScalar {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl Zeroize for SecretScalar {
    fn zeroize(&mut self) {
        wipe(&mut self.0);
    }
}

impl Drop for SecretScalar {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for SecretScalar {}

impl ConstantTimeEq for SecretScalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        let len = self.0.bits().max(other.0.bits()).div_ceil(8);
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        self.to_bytes(len).ct_eq(&other.to_bytes(len))
    }
}

/// Constant-time comparison
impl Eq for SecretScalar {}
impl PartialEq for SecretScalar {
    fn eq(&self, other: &SecretScalar) -> bool {
        self.ct_eq(other).into()
    }
}

impl Debug for SecretScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScalar").finish_non_exhaustive()
    }
}
