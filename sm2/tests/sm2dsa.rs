//! SM2DSA tests.

#![cfg(feature = "dsa")]

mod common;

use hex_literal::hex;
use proptest::prelude::*;
use sm2::{
    AffinePoint, BigUint, ErrorKind, PointFormat, Sm2,
    dsa::{
        Signature,
        signature::{Signer, Verifier},
    },
};

const PUBLIC_KEY: [u8; 65] = hex!(
    "0408D77AE04C01CC4C1104360DD8AF6B6F7DF334283D7C1A6AFD5652407B87BEE5014E2A57C36C150D16324DC664E31E6432359609C4E79847A5B161C8C7364C8A"
);
const IDENTITY: &[u8] = b"example@rustcrypto.org";
const MSG: &[u8] = b"testing";

// Created using:
// $ openssl pkeyutl -sign -in - -inkey pkcs8-private-key.pem -out sig -digest sm3 -pkeyopt distid:example@rustcrypto.org
const SIG: [u8; 64] = hex!(
    "d1dcccedd9fb785e0f67c16b7c52901625c0b69de9bca2144acc7be713cad2fc" // r
    "f7d1eae6e3a157b36c65f672f738ca8b46298bf149a6510072c431b49cd88b1c" // s
);

// GB/T 32918.5-2017 A.2
const GMT_ID: &[u8] = b"1234567812345678";
const GMT_MSG: &[u8] = b"message digest";
const GMT_D: [u8; 32] = hex!("3945208F7B2144B13F36E38AC6D39F95889393692860B51A42FB81EF4DF7C5B8");
const GMT_K: [u8; 32] = hex!("59276E27D506861A16680F3AD9C02DCCEF3CC1FA3CDBE4CE6D54B80DEAC1BC21");
const GMT_Q: [u8; 33] = hex!("0309F9DF311E5421A150DD7D161E4BC5C672179FAD1833FC076BB08FF356F35020");
const GMT_QY: [u8; 32] = hex!("CCEA490CE26775A52DC6EA718CC1AA600AED05FBF35E084A6632F6072DA9AD13");
const GMT_Z: [u8; 32] = hex!("B2E14C5C79C6DF5B85F4FE7ED8DB7A262B9DA7E07CCB0EA9F4747B8CCDA8A4F3");
const GMT_E: [u8; 32] = hex!("F0B43E94BA45ACCAACE692ED534382EB17E6AB5A19CE7B31F4486FDFC0D28640");
const GMT_SIG: [u8; 64] = hex!(
    "F5A03B0648D2C4630EEAC513E1BB81A15944DA3827D5B74143AC7EACEEE720B3" // r
    "B1B6AA29DF212FD8763182BC0D421CA1BB9038FD1F7F42D4840B69C485BBC1AA" // s
);

fn verifier(public_key: &[u8]) -> Sm2 {
    let mut sm2 = Sm2::new();
    sm2.set_distid(IDENTITY).unwrap();
    let (point, _) = sm2.decode_point(public_key).unwrap();
    sm2.import_public_key(&point).unwrap();
    sm2
}

#[test]
fn verify_test_vector() {
    let vk = verifier(&PUBLIC_KEY);
    let sig = Signature::try_from(&SIG[..]).expect("decoded Signature failed");
    assert!(vk.verify(MSG, &sig).is_ok());
    assert_eq!(vk.verify_data(&SIG, MSG), Ok(true));
    assert_eq!(vk.verify_data(&SIG, b"testinG"), Ok(false));
}

#[test]
fn sign_gmt_vector() {
    let (mut sm2, script) = common::scripted_sm2();
    sm2.set_distid(GMT_ID).unwrap();
    sm2.import_private_key(&BigUint::from_bytes_be(&GMT_D)).unwrap();

    let q = sm2.encode_point(sm2.public_key(), PointFormat::Compressed).unwrap();
    assert_eq!(q, GMT_Q);
    assert_eq!(sm2.public_key().y(), Some(&BigUint::from_bytes_be(&GMT_QY)));
    assert_eq!(sm2.z_value().unwrap().as_slice(), GMT_Z);

    script.push_scalar(&sm2, &GMT_K);
    let sig = sm2.sign_data(GMT_MSG).unwrap();
    assert!(script.is_empty());
    assert_eq!(sig.as_ref(), GMT_SIG);

    // same signature straight from the message representative
    script.push_scalar(&sm2, &GMT_K);
    let (r, s) = sm2.sign_hash(&BigUint::from_bytes_be(&GMT_E)).unwrap();
    assert_eq!(r, sig.r());
    assert_eq!(s, sig.s());

    assert_eq!(sm2.verify_data(&GMT_SIG, GMT_MSG), Ok(true));
}

#[test]
fn verify_gmt_vector_with_public_key_only() {
    let mut sm2 = Sm2::new();
    sm2.set_distid(GMT_ID).unwrap();
    let (q, consumed) = sm2.decode_point(&GMT_Q).unwrap();
    assert_eq!(consumed, GMT_Q.len());
    sm2.import_public_key(&q).unwrap();

    assert_eq!(sm2.verify_data(&GMT_SIG, GMT_MSG), Ok(true));
    assert_eq!(sm2.verify_data(&GMT_SIG[..63], GMT_MSG), Ok(false));
    assert_eq!(sm2.verify_data(&[&GMT_SIG[..], &[0u8][..]].concat(), GMT_MSG), Ok(false));

    let err = sm2.sign_data(GMT_MSG).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);
}

#[test]
fn verify_without_public_key() {
    let sm2 = Sm2::new();
    let err = sm2.verify_data(&GMT_SIG, GMT_MSG).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);
}

#[test]
fn identity_is_bound_into_signature() {
    let mut sm2 = Sm2::new();
    sm2.set_distid(GMT_ID).unwrap();
    sm2.generate_key_pair();
    let sig = sm2.sign_data(GMT_MSG).unwrap();

    sm2.set_distid(IDENTITY).unwrap();
    assert_eq!(sm2.verify_data(sig.as_ref(), GMT_MSG), Ok(false));
}

prop_compose! {
    fn signing_key()(bytes in any::<[u8; 32]>()) -> Sm2 {
        let mut sm2 = Sm2::new();
        sm2.set_distid(IDENTITY).unwrap();
        let n = sm2.params().order().clone();
        let d = BigUint::from_bytes_be(&bytes) % (&n - 2u32) + 1u32;
        sm2.import_private_key(&d).unwrap();
        sm2
    }
}

proptest! {
    #[test]
    fn sign_and_verify(sk in signing_key()) {
        let signature = sk.sign(MSG);
        prop_assert!(sk.verify(MSG, &signature).is_ok());

        let mut vk = Sm2::new();
        vk.set_distid(IDENTITY).unwrap();
        vk.import_public_key(sk.public_key()).unwrap();
        prop_assert!(vk.verify(MSG, &signature).is_ok());
    }

    #[test]
    fn reject_invalid_signature(sk in signing_key(), byte in 0usize..64, bit in 0usize..8) {
        let mut signature_bytes = sk.sign(MSG).to_vec();

        // tweak signature to make it invalid
        signature_bytes[byte] ^= 1 << bit;

        let signature = Signature::try_from(signature_bytes.as_slice()).unwrap();
        prop_assert!(sk.verify(MSG, &signature).is_err());
    }

    #[test]
    fn reject_other_key(sk in signing_key()) {
        let signature = sk.sign(MSG);
        let g: AffinePoint = sk.params().generator().clone();

        let mut vk = Sm2::new();
        vk.set_distid(IDENTITY).unwrap();
        vk.import_public_key(&g).unwrap();
        prop_assert!(vk.verify(MSG, &signature).is_err());
    }
}
