//! Deterministic random number generator for reproducing published test
//! vectors.

#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use rand_core::{CryptoRng, RngCore};
use sm2::{BigUint, DeriveBytes, Sm2, sm3::Sm3, weierstrass::int_to_bytes};

/// Serves scripted chunks first, one per `fill_bytes` call, then falls back
/// to an SM3 counter-mode stream.
pub struct ScriptedRng {
    script: Rc<RefCell<VecDeque<Vec<u8>>>>,
    stream: DeriveBytes<Sm3>,
}

/// Handle for queueing chunks after the generator has been moved into a
/// context.
#[derive(Clone)]
pub struct Script(Rc<RefCell<VecDeque<Vec<u8>>>>);

impl ScriptedRng {
    pub fn new() -> (Self, Script) {
        let script = Rc::new(RefCell::new(VecDeque::new()));
        let rng = Self {
            script: Rc::clone(&script),
            stream: DeriveBytes::new(b"scripted rng"),
        };
        (rng, Script(script))
    }
}

impl Script {
    pub fn push(&self, chunk: Vec<u8>) {
        self.0.borrow_mut().push_back(chunk);
    }

    /// Queue the bytes that make the context draw `k` as its next ephemeral
    /// scalar.
    pub fn push_scalar(&self, sm2: &Sm2<Sm3, ScriptedRng>, k: &[u8]) {
        let order = sm2.params().order();
        let bound = BigUint::from(1u32) << (order.bits() * 11 / 16);
        let offset = BigUint::from_bytes_be(k) - bound;
        self.push(int_to_bytes(&offset, sm2.params().scalar_len()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.fill_bytes(&mut bytes);
        u32::from_le_bytes(bytes)
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        self.fill_bytes(&mut bytes);
        u64::from_le_bytes(bytes)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match self.script.borrow_mut().pop_front() {
            Some(chunk) => {
                assert_eq!(chunk.len(), dest.len(), "scripted chunk width");
                dest.copy_from_slice(&chunk);
            }
            None => self.stream.fill_bytes(dest),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for ScriptedRng {}

/// SM2 context over the recommended curve driven by a [`ScriptedRng`].
pub fn scripted_sm2() -> (Sm2<Sm3, ScriptedRng>, Script) {
    let (rng, script) = ScriptedRng::new();
    (Sm2::<Sm3, ScriptedRng>::with_rng(rng), script)
}
