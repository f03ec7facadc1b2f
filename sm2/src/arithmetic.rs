//! SM2 recommended curve parameters.
//!
//! ```text
//! p = FFFFFFFE FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFF 00000000 FFFFFFFF FFFFFFFF
//! a = FFFFFFFE FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFF 00000000 FFFFFFFF FFFFFFFC
//! b = 28E9FA9E 9D9F5E34 4D5A9E4B CF6509A7 F39789F5 15AB8F92 DDBCBD41 4D940E93
//! n = FFFFFFFE FFFFFFFF FFFFFFFF FFFFFFFF 7203DF6B 21C6052B 53BBF409 39D54123
//! h = 1
//! ```

use hex_literal::hex;
use std::sync::{Arc, LazyLock};
use weierstrass::{AffinePoint, BigUint, EcParameter, ShortWeierstrassCurve};

const P: [u8; 32] = hex!("FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF00000000FFFFFFFFFFFFFFFF");
const A: [u8; 32] = hex!("FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF00000000FFFFFFFFFFFFFFFC");
const B: [u8; 32] = hex!("28E9FA9E9D9F5E344D5A9E4BCF6509A7F39789F515AB8F92DDBCBD414D940E93");
const GX: [u8; 32] = hex!("32C4AE2C1F1981195F9904466A39C9948FE30BBFF2660BE1715A4589334C74C7");
const GY: [u8; 32] = hex!("BC3736A2F4F6779C59BDCEE36B692153D0A9877CC62A474002DF32E52139F0A0");
const N: [u8; 32] = hex!("FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFF7203DF6B21C6052B53BBF40939D54123");

static RECOMMENDED: LazyLock<Arc<EcParameter>> = LazyLock::new(|| {
    Arc::new(build().expect("SM2 recommended parameters are well formed"))
});

fn build() -> weierstrass::Result<EcParameter> {
    let curve = ShortWeierstrassCurve::new(
        BigUint::from_bytes_be(&P),
        BigUint::from_bytes_be(&A),
        BigUint::from_bytes_be(&B),
    )?;
    let g = AffinePoint::new(BigUint::from_bytes_be(&GX), BigUint::from_bytes_be(&GY));

    EcParameter::new(curve, g, BigUint::from_bytes_be(&N), BigUint::from(1u32))
}

/// SM2 recommended domain parameters (GM/T 0003.5-2012).
///
/// Built once and shared.
pub fn recommended_params() -> Arc<EcParameter> {
    Arc::clone(&RECOMMENDED)
}
