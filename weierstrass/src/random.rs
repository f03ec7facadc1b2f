//! Uniform sampling of big integers.

use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::secret::wipe;

/// Sample an integer uniformly at random from `[lo, hi)`.
///
/// Draws as many bytes as the width of `hi - lo`, masks the excess bits of
/// the leading byte and rejects out-of-range values. Returns `lo` when the
/// range is empty.
pub fn random_in_range<R>(rng: &mut R, lo: &BigUint, hi: &BigUint) -> BigUint
where
    R: CryptoRngCore + ?Sized,
{
    if hi <= lo {
        return lo.clone();
    }

    let range = hi - lo;
    let width = range.to_bytes_be();
    let mask = u8::MAX >> width[0].leading_zeros();
    let mut buf = Zeroizing::new(vec![0u8; width.len()]);

    loop {
        rng.fill_bytes(&mut buf);
        buf[0] &= mask;

        let mut x = BigUint::from_bytes_be(&buf);
        if x < range {
            let ret = lo + &x;
            wipe(&mut x);
            return ret;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    #[test]
    fn empty_range_returns_lower_bound() {
        let lo = BigUint::from(7u32);
        assert_eq!(random_in_range(&mut OsRng, &lo, &lo), lo);
        assert_eq!(random_in_range(&mut OsRng, &lo, &BigUint::from(3u32)), lo);
    }

    #[test]
    fn samples_stay_in_range() {
        let lo = BigUint::from(1000u32);
        let hi = BigUint::from(1257u32);
        let mut seen_low = false;
        let mut seen_high = false;

        for _ in 0..4096 {
            let x = random_in_range(&mut OsRng, &lo, &hi);
            assert!(x >= lo && x < hi);
            seen_low |= x < BigUint::from(1128u32);
            seen_high |= x >= BigUint::from(1128u32);
        }

        assert!(seen_low && seen_high);
    }

    #[test]
    fn single_value_range() {
        let lo = BigUint::from(41u32);
        let hi = BigUint::from(42u32);
        for _ in 0..16 {
            assert_eq!(random_in_range(&mut OsRng, &lo, &hi), lo);
        }
    }
}
