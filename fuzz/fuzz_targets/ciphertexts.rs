#![no_main]
// Feeds arbitrary ciphertexts to SM2 decryption in both component orders.
use libfuzzer_sys::fuzz_target;
use rand_chacha::{ChaChaRng, rand_core::SeedableRng};
use sm2::{BigUint, Sm2, pke::Mode, sm3::Sm3};

const PRIVATE_KEY: [u8; 32] = [
    0x3d, 0xdd, 0x2a, 0x36, 0x79, 0xbf, 0x6f, 0x1d, 0xfc, 0x3b, 0x49, 0xd3, 0xe9, 0x91, 0x14, 0x71,
    0x8e, 0x48, 0xec, 0x17, 0x0e, 0xb4, 0xe4, 0xd3, 0xa8, 0x20, 0x52, 0xda, 0xb1, 0x9e, 0x8b, 0x50,
];

fuzz_target!(|data: &[u8]| {
    let mut sm2 = Sm2::<Sm3, ChaChaRng>::with_rng(ChaChaRng::from_seed([7; 32]));
    sm2.import_private_key(&BigUint::from_bytes_be(&PRIVATE_KEY))
        .unwrap();

    for mode in [Mode::C1C3C2, Mode::C1C2C3] {
        if let Ok(msg) = sm2.decrypt_data_with(data, mode) {
            // only a genuine ciphertext gets past the C3 check
            let cipher = sm2.parse_cipher(data, mode).unwrap();
            assert_eq!(msg.len(), cipher.c2().len());
        }
    }
});
