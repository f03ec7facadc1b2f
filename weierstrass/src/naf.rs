//! Non-adjacent form (NAF) scalar recoding.
//!
//! Binary NAF digits are packed two per byte as signed nibbles: digit `2i`
//! goes in the low nibble of byte `i` and digit `2i + 1` in the high
//! nibble. Each byte therefore reads as one radix-4 digit `2·hi + lo` in
//! `[-2, 2]`, which the multiplication ladders consume two doublings at a
//! time. The ladders may rewrite digits so a nibble can temporarily hold
//! any value in `[-8, 7]`.

use core::cell::RefCell;
use num_bigint::BigUint;
use zeroize::Zeroize;

thread_local! {
    static SCRATCH: RefCell<(Vec<u8>, Vec<u8>)> = const { RefCell::new((Vec::new(), Vec::new())) };
}

/// High (odd) nibble of a packed digit pair.
#[inline]
pub(crate) fn hi(b: u8) -> i8 {
    i8::from_ne_bytes([b]) >> 4
}

/// Low (even) nibble of a packed digit pair.
#[inline]
pub(crate) fn lo(b: u8) -> i8 {
    i8::from_ne_bytes([b << 4]) >> 4
}

/// Radix-4 value of a packed digit pair.
#[inline]
pub(crate) fn value(b: u8) -> i8 {
    2 * hi(b) + lo(b)
}

/// Pack two signed nibbles into one byte.
#[inline]
pub(crate) fn pack(hi: i8, lo: i8) -> u8 {
    (hi.to_ne_bytes()[0] << 4) | (lo.to_ne_bytes()[0] & 0x0f)
}

/// Pack a radix-4 value from `{0, ±1, ±2, ±4}` using a single nibble.
#[inline]
pub(crate) fn pack_value(v: i8) -> u8 {
    if v % 2 == 0 { pack(v / 2, 0) } else { pack(0, v) }
}

/// Recode `k` into packed NAF digits, replacing the contents of `out`.
///
/// Trailing zero bytes are dropped, so `out` is empty iff `k` is zero.
pub(crate) fn encode_into(k: &BigUint, out: &mut Vec<u8>) {
    out.zeroize();

    let bits = k.bits();
    let mut carry = 0u8;
    let mut nibbles = [0i8; 2];

    for i in 0..=bits {
        let t = u8::from(k.bit(i)) + carry;
        let digit = match t {
            1 if k.bit(i + 1) => {
                carry = 1;
                -1
            }
            1 => {
                carry = 0;
                1
            }
            2 => {
                carry = 1;
                0
            }
            _ => {
                carry = 0;
                0
            }
        };

        nibbles[usize::from(i % 2 == 1)] = digit;
        if i % 2 == 1 || i == bits {
            out.push(pack(nibbles[1], nibbles[0]));
            nibbles = [0; 2];
        }
    }

    while out.last() == Some(&0) {
        out.pop();
    }
}

/// Run `f` with this thread's pair of NAF scratch buffers.
///
/// Both buffers are zeroized when `f` returns or unwinds. Re-entrant calls
/// on the same thread get a fresh local pair; callers must not interleave
/// uses of the same pair across concurrent computations.
pub(crate) fn with_scratch<T>(f: impl FnOnce(&mut Vec<u8>, &mut Vec<u8>) -> T) -> T {
    struct Wiped<'a>(&'a mut Vec<u8>, &'a mut Vec<u8>);

    impl Drop for Wiped<'_> {
        fn drop(&mut self) {
            self.0.zeroize();
            self.1.zeroize();
        }
    }

    SCRATCH.with(|cell| match cell.try_borrow_mut() {
        Ok(mut bufs) => {
            let (a, b) = &mut *bufs;
            let guard = Wiped(a, b);
            f(&mut *guard.0, &mut *guard.1)
        }
        Err(_) => {
            let (mut a, mut b) = (Vec::new(), Vec::new());
            let guard = Wiped(&mut a, &mut b);
            f(&mut *guard.0, &mut *guard.1)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use proptest::prelude::*;

    fn decode(naf: &[u8]) -> BigInt {
        naf.iter()
            .rev()
            .fold(BigInt::from(0), |acc, &b| acc * 4 + value(b))
    }

    fn binary_digits(naf: &[u8]) -> Vec<i8> {
        naf.iter().flat_map(|&b| [lo(b), hi(b)]).collect()
    }

    #[test]
    fn nibble_helpers() {
        assert_eq!(hi(0xF0), -1);
        assert_eq!(lo(0x0F), -1);
        assert_eq!(value(0x10), 2);
        assert_eq!(value(0xE0), -4);
        assert_eq!(value(0x20), 4);
        assert_eq!(pack(-1, 0), 0xF0);
        assert_eq!(pack(0, -1), 0x0F);
        assert_eq!(pack(3, -2), 0x3E);
        assert_eq!(pack_value(-4), 0xE0);
        assert_eq!(pack_value(2), 0x10);
        assert_eq!(pack_value(-1), 0x0F);
    }

    #[test]
    fn small_values() {
        let mut out = Vec::new();

        encode_into(&BigUint::from(0u32), &mut out);
        assert!(out.is_empty());

        // 7 = 8 - 1
        encode_into(&BigUint::from(7u32), &mut out);
        assert_eq!(binary_digits(&out), [-1, 0, 0, 1]);

        // 3 = 4 - 1
        encode_into(&BigUint::from(3u32), &mut out);
        assert_eq!(binary_digits(&out), [-1, 0, 1, 0]);
    }

    #[test]
    fn scratch_is_wiped() {
        let len = with_scratch(|a, b| {
            a.extend_from_slice(&[1, 2, 3]);
            b.push(4);
            a.len() + b.len()
        });
        assert_eq!(len, 4);
        with_scratch(|a, b| assert!(a.is_empty() && b.is_empty()));
    }

    #[test]
    fn nested_scratch_does_not_alias() {
        with_scratch(|a, _| {
            a.push(9);
            with_scratch(|inner, _| {
                assert!(inner.is_empty());
                inner.push(1);
            });
            assert_eq!(a.as_slice(), &[9]);
        });
    }

    proptest! {
        #[test]
        fn reconstructs(bytes in proptest::collection::vec(any::<u8>(), 0..40)) {
            let k = BigUint::from_bytes_be(&bytes);
            let mut out = Vec::new();
            encode_into(&k, &mut out);
            prop_assert_eq!(decode(&out), BigInt::from(k));
        }

        #[test]
        fn non_adjacent(bytes in proptest::collection::vec(any::<u8>(), 1..40)) {
            let k = BigUint::from_bytes_be(&bytes);
            let mut out = Vec::new();
            encode_into(&k, &mut out);
            let digits = binary_digits(&out);
            for pair in digits.windows(2) {
                prop_assert!(pair[0] == 0 || pair[1] == 0);
            }
            prop_assert!(digits.iter().all(|d| (-1..=1).contains(d)));
        }
    }
}
