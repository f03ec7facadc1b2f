#![no_main]
// Decodes arbitrary points on the SM2 recommended curve and checks the group
// laws on whatever decodes successfully.
use libfuzzer_sys::fuzz_target;
use rand_chacha::{ChaChaRng, rand_core::SeedableRng};
use sm2::{
    BigUint, PointFormat, recommended_params,
    weierstrass::{JacobianPoint, ShortWeierstrassCurve},
};

fn test_group(
    curve: &ShortWeierstrassCurve,
    p: &JacobianPoint,
    g: &JacobianPoint,
    s: &BigUint,
    rng: &mut ChaChaRng,
) {
    // Test that addition and doubling are consistent
    assert_eq!(
        curve.to_affine(&curve.double(p)),
        curve.to_affine(&curve.add(p, p))
    );

    // Test that negation works correctly
    assert!(curve.add(p, &curve.negate(p)).is_identity());

    // Test scalar multiplication distributive property
    let sp = curve.mul(s, p, rng);
    let twice = curve.mul(&(s << 1u32), p, rng);
    assert_eq!(curve.to_affine(&curve.add(&sp, &sp)), curve.to_affine(&twice));

    // Test that the dual multiplication agrees with two single ones
    let sg = curve.mul(s, g, rng);
    assert_eq!(
        curve.to_affine(&curve.mul_add(s, p, s, g, rng)),
        curve.to_affine(&curve.add(&sp, &sg))
    );
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 64 {
        return;
    }

    let mut rng = ChaChaRng::from_seed(data[0..32].try_into().unwrap());
    let params = recommended_params();
    let curve = params.curve();

    let Ok((point, consumed)) = curve.decode_point(&data[32..], &mut rng) else {
        return;
    };
    assert!(consumed <= data.len() - 32);
    assert!(curve.is_on_curve(&point));

    for format in [PointFormat::Compressed, PointFormat::Uncompressed, PointFormat::Hybrid] {
        let bytes = curve.encode_point(&point, format).unwrap();
        assert_eq!(
            curve.decode_point(&bytes, &mut rng),
            Ok((point.clone(), bytes.len()))
        );
    }

    let scalar = BigUint::from_bytes_be(&data[0..32]);
    let g = JacobianPoint::from(params.generator());
    test_group(curve, &JacobianPoint::from(&point), &g, &scalar, &mut rng);
});
