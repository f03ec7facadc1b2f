//! SM2 key derivation function.
//!
//! ```text
//! K = H(Z || ct) || H(Z || ct+1) || ...     ct = 0x00000001, 32-bit big endian
//! ```

use core::fmt::{self, Debug};
use sm3::digest::{Digest, FixedOutputReset, Output};
use zeroize::{Zeroize, Zeroizing};

/// Byte stream derived from a shared secret `Z` with a counter-mode hash.
///
/// Output is produced one digest-sized block at a time and handed out byte
/// by byte; unread bytes of a block are kept for the next call. All state is
/// wiped when the stream is dropped.
pub struct DeriveBytes<D: Digest + FixedOutputReset> {
    hasher: D,

    /// `Z || ct`
    input: Zeroizing<Vec<u8>>,

    /// Current block.
    block: Zeroizing<Vec<u8>>,

    /// Offset of the first unread byte of `block`.
    pos: usize,
}

impl<D: Digest + FixedOutputReset> DeriveBytes<D> {
    /// Start a stream for the shared secret `z`.
    pub fn new(z: &[u8]) -> Self {
        let mut input = Zeroizing::new(Vec::with_capacity(z.len() + 4));
        input.extend_from_slice(z);
        input.extend_from_slice(&[0; 4]);

        Self {
            hasher: D::new(),
            input,
            block: Zeroizing::new(Vec::new()),
            pos: 0,
        }
    }

    /// Size of a block, i.e. the digest output size.
    pub fn block_size(&self) -> usize {
        <D as Digest>::output_size()
    }

    /// Increment the counter and hash the next block into `out`.
    ///
    /// Bypasses (and does not disturb) any buffered bytes.
    pub fn next_block(&mut self, out: &mut Output<D>) {
        let ctr = self.input.len() - 4;
        for byte in self.input[ctr..].iter_mut().rev() {
            *byte = byte.wrapping_add(1);
            if *byte != 0 {
                break;
            }
        }

        Digest::update(&mut self.hasher, &self.input[..]);
        Digest::finalize_into_reset(&mut self.hasher, out);
    }

    /// Fill `out` with the next bytes of the stream.
    pub fn fill_bytes(&mut self, out: &mut [u8]) {
        let mut written = 0;

        while written < out.len() {
            if self.pos == self.block.len() {
                let mut block = Output::<D>::default();
                self.next_block(&mut block);
                self.block.clear();
                self.block.extend_from_slice(&block);
                block.as_mut_slice().zeroize();
                self.pos = 0;
            }

            let n = (out.len() - written).min(self.block.len() - self.pos);
            out[written..written + n].copy_from_slice(&self.block[self.pos..self.pos + n]);
            self.pos += n;
            written += n;
        }
    }

    /// Derive `len` bytes.
    pub fn derive(&mut self, len: usize) -> Zeroizing<Vec<u8>> {
        let mut out = Zeroizing::new(vec![0u8; len]);
        self.fill_bytes(&mut out);
        out
    }

    /// XOR the next `data.len()` bytes of the stream into `data`.
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        let keystream = self.derive(data.len());
        for (byte, k) in data.iter_mut().zip(keystream.iter()) {
            *byte ^= k;
        }
    }

    /// Rewind to the start of the stream.
    pub fn reset(&mut self) {
        let ctr = self.input.len() - 4;
        self.input[ctr..].zeroize();
        self.block.zeroize();
        self.pos = 0;
        Digest::reset(&mut self.hasher);
    }
}

impl<D: Digest + FixedOutputReset> Debug for DeriveBytes<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeriveBytes").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use sm3::Sm3;

    #[test]
    fn first_block_uses_counter_one() {
        let z = b"shared secret";
        let mut kdf = DeriveBytes::<Sm3>::new(z);

        let expected = Sm3::new()
            .chain_update(z)
            .chain_update(1u32.to_be_bytes())
            .finalize();
        assert_eq!(&kdf.derive(32)[..], &expected[..]);

        let expected = Sm3::new()
            .chain_update(z)
            .chain_update(2u32.to_be_bytes())
            .finalize();
        assert_eq!(&kdf.derive(32)[..], &expected[..]);
    }

    #[test]
    fn stream_is_independent_of_read_sizes() {
        let z = hex!("00112233445566778899AABBCCDDEEFF");
        let whole = DeriveBytes::<Sm3>::new(&z).derive(100);

        let mut kdf = DeriveBytes::<Sm3>::new(&z);
        let mut pieces = Vec::new();
        for n in [1, 7, 31, 0, 33, 28] {
            pieces.extend_from_slice(&kdf.derive(n));
        }
        assert_eq!(&pieces[..], &whole[..]);
    }

    #[test]
    fn reset_rewinds() {
        let mut kdf = DeriveBytes::<Sm3>::new(b"z");
        let first = kdf.derive(45);
        let _ = kdf.derive(3);
        kdf.reset();
        assert_eq!(kdf.derive(45), first);
    }

    #[test]
    fn counter_carries() {
        let mut kdf = DeriveBytes::<Sm3>::new(b"z");
        let last = kdf.input.len() - 1;
        kdf.input[last] = 0xFF;

        let mut block = Output::<Sm3>::default();
        kdf.next_block(&mut block);
        assert_eq!(&kdf.input[last - 3..], &[0, 0, 1, 0]);
        assert_eq!(
            block,
            Sm3::new().chain_update(b"z").chain_update(256u32.to_be_bytes()).finalize()
        );
    }

    #[test]
    fn keystream_xor() {
        let mut data = *b"plaintext";
        DeriveBytes::<Sm3>::new(b"k").apply_keystream(&mut data);
        assert_ne!(&data, b"plaintext");
        DeriveBytes::<Sm3>::new(b"k").apply_keystream(&mut data);
        assert_eq!(&data, b"plaintext");
    }
}
