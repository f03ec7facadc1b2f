//! Domain parameters and key pairs.

use core::fmt::{self, Debug};
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::Zero;
use zeroize::Zeroizing;

use crate::{AffinePoint, Error, Result, SecretScalar, ShortWeierstrassCurve};

/// Elliptic curve domain parameters: a curve, a base point `G` of prime
/// order `N`, and the cofactor `H`.
#[derive(Clone, PartialEq, Eq)]
pub struct EcParameter {
    curve: ShortWeierstrassCurve,
    g: AffinePoint,
    n: BigUint,
    h: BigUint,

    /// Bit length of `N`, less one when `N` is a power of two.
    bits: u64,

    /// Byte length of a serialized scalar.
    scalar_len: usize,
}

impl EcParameter {
    /// Create domain parameters.
    ///
    /// `G` must lie on the curve and `N` must be greater than 2. Primality of
    /// `N` and the order of `G` are not checked.
    pub fn new(
        curve: ShortWeierstrassCurve,
        g: AffinePoint,
        n: BigUint,
        h: BigUint,
    ) -> Result<Self> {
        curve.validate_point(&g)?;

        if n <= BigUint::from(2u32) || h.is_zero() {
            return Err(Error::InvalidParameter);
        }

        let mut bits = n.bits();
        if n.trailing_zeros() == Some(bits - 1) {
            bits -= 1;
        }
        let scalar_len = usize::try_from(bits.div_ceil(8)).map_err(|_| Error::InvalidParameter)?;

        Ok(Self {
            curve,
            g,
            n,
            h,
            bits,
            scalar_len,
        })
    }

    /// Underlying curve.
    pub fn curve(&self) -> &ShortWeierstrassCurve {
        &self.curve
    }

    /// Base point `G`.
    pub fn generator(&self) -> &AffinePoint {
        &self.g
    }

    /// Order `N` of the base point.
    pub fn order(&self) -> &BigUint {
        &self.n
    }

    /// Cofactor `H`.
    pub fn cofactor(&self) -> &BigUint {
        &self.h
    }

    /// Bit length of the group order.
    ///
    /// One less than the bit length of `N` when `N` is a power of two.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Size of a serialized scalar in bytes.
    pub fn scalar_len(&self) -> usize {
        self.scalar_len
    }

    /// Size of a serialized curve coordinate in bytes.
    pub fn coordinate_len(&self) -> usize {
        self.curve.coordinate_len()
    }

    /// Describe these parameters as an explicit prime curve.
    pub fn to_curve_description(&self) -> CurveDescription {
        CurveDescription::PrimeShortWeierstrass {
            prime: self.curve.p().clone(),
            a: self.curve.a().clone(),
            b: self.curve.b().clone(),
            generator: self.g.clone(),
            order: self.n.clone(),
            cofactor: self.h.clone(),
        }
    }

    /// Build parameters from a curve description.
    ///
    /// [`CurveDescription::Implicit`] carries no parameters and yields
    /// `None`. Every curve type other than an explicit prime short
    /// Weierstrass curve is rejected with [`Error::UnsupportedCurve`].
    pub fn from_curve_description(desc: &CurveDescription) -> Result<Option<Self>> {
        match desc {
            CurveDescription::Implicit => Ok(None),
            CurveDescription::PrimeShortWeierstrass {
                prime,
                a,
                b,
                generator,
                order,
                cofactor,
            } => {
                let curve = ShortWeierstrassCurve::new(prime.clone(), a.clone(), b.clone())?;
                Self::new(curve, generator.clone(), order.clone(), cofactor.clone()).map(Some)
            }
            CurveDescription::Named(_)
            | CurveDescription::PrimeMontgomery
            | CurveDescription::PrimeTwistedEdwards
            | CurveDescription::Characteristic2 => Err(Error::UnsupportedCurve),
        }
    }
}

impl TryFrom<&CurveDescription> for EcParameter {
    type Error = Error;

    fn try_from(desc: &CurveDescription) -> Result<Self> {
        Self::from_curve_description(desc)?.ok_or(Error::UnsupportedCurve)
    }
}

impl Debug for EcParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcParameter")
            .field("curve", &self.curve)
            .field("g", &self.g)
            .field("n", &format_args!("{:X}", self.n))
            .field("h", &self.h)
            .finish()
    }
}

/// Curve types an interchange format may describe.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum CurveDescription {
    /// No explicit parameters; the receiver's are implied.
    Implicit,

    /// Curve identified by object identifier.
    Named(String),

    /// Explicit prime-field short Weierstrass curve.
    PrimeShortWeierstrass {
        /// Field modulus `p`.
        prime: BigUint,
        /// Coefficient `a`.
        a: BigUint,
        /// Coefficient `b`.
        b: BigUint,
        /// Base point `G`.
        generator: AffinePoint,
        /// Order `N` of the base point.
        order: BigUint,
        /// Cofactor `H`.
        cofactor: BigUint,
    },

    /// Prime-field Montgomery curve.
    PrimeMontgomery,

    /// Prime-field twisted Edwards curve.
    PrimeTwistedEdwards,

    /// Binary field curve.
    Characteristic2,
}

/// Key pair: private scalar `D`, public point `Q` and optionally the domain
/// parameters they belong to.
///
/// `D = 0` means no private key and `Q = O` means no public key.
#[derive(Clone, Default)]
pub struct EcKeyPair {
    /// Private scalar.
    pub d: SecretScalar,

    /// Public point.
    pub q: AffinePoint,

    /// Domain parameters.
    pub params: Option<Arc<EcParameter>>,
}

impl EcKeyPair {
    /// Does this pair carry a private key?
    pub fn has_private_key(&self) -> bool {
        !self.d.is_zero()
    }

    /// Does this pair carry a public key?
    pub fn has_public_key(&self) -> bool {
        !self.q.is_identity()
    }

    /// Export as an interchange record.
    ///
    /// Without parameters the curve is [`CurveDescription::Implicit`] and
    /// `D` is serialized with its minimal length.
    pub fn to_key_parameters(&self) -> KeyParameters {
        let d = self.has_private_key().then(|| match &self.params {
            Some(params) => self.d.to_bytes(params.scalar_len()),
            None => Zeroizing::new(self.d.expose().to_bytes_be()),
        });

        KeyParameters {
            curve: self
                .params
                .as_ref()
                .map_or(CurveDescription::Implicit, |p| p.to_curve_description()),
            d,
            q: self.q.clone(),
        }
    }

    /// Import an interchange record.
    pub fn from_key_parameters(record: &KeyParameters) -> Result<Self> {
        let params = EcParameter::from_curve_description(&record.curve)?.map(Arc::new);
        let d = record
            .d
            .as_ref()
            .map(|d| SecretScalar::new(BigUint::from_bytes_be(d)))
            .unwrap_or_default();

        Ok(Self {
            d,
            q: record.q.clone(),
            params,
        })
    }
}

impl Debug for EcKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcKeyPair")
            .field("q", &self.q)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Key pair interchange record.
#[derive(Clone)]
pub struct KeyParameters {
    /// Curve the key belongs to.
    pub curve: CurveDescription,

    /// Big endian private scalar, if any.
    pub d: Option<Zeroizing<Vec<u8>>>,

    /// Public point.
    pub q: AffinePoint,
}

impl Debug for KeyParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyParameters")
            .field("curve", &self.curve)
            .field("q", &self.q)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;
    use crate::curve::tests::*;

    fn toy_params() -> EcParameter {
        let curve = toy_curve();
        // (3, 6) has order 5 on y² = x³ + 2x + 3 over GF(97)
        let g = AffinePoint::new(BigUint::from(3u32), BigUint::from(6u32));
        EcParameter::new(curve, g, BigUint::from(5u32), BigUint::from(20u32)).expect("valid")
    }

    #[test]
    fn bit_lengths() {
        let params = toy_params();
        assert_eq!(params.bits(), 3);
        assert_eq!(params.scalar_len(), 1);
        assert_eq!(params.coordinate_len(), 1);

        let pow2 = EcParameter::new(
            toy_curve(),
            params.generator().clone(),
            BigUint::from(64u32),
            BigUint::one(),
        )
        .expect("valid");
        assert_eq!(pow2.bits(), 6);
    }

    #[test]
    fn rejects_off_curve_generator() {
        let g = AffinePoint::new(BigUint::from(3u32), BigUint::from(7u32));
        assert_eq!(
            EcParameter::new(toy_curve(), g, BigUint::from(5u32), BigUint::one()),
            Err(Error::PointNotOnCurve)
        );
    }

    #[test]
    fn curve_description_conversions() {
        let params = toy_params();
        let desc = params.to_curve_description();
        let back = EcParameter::try_from(&desc).expect("prime curve");
        assert_eq!(back, params);

        assert_eq!(EcParameter::from_curve_description(&CurveDescription::Implicit), Ok(None));
        for unsupported in [
            CurveDescription::Named("1.2.156.10197.1.301".into()),
            CurveDescription::PrimeMontgomery,
            CurveDescription::PrimeTwistedEdwards,
            CurveDescription::Characteristic2,
        ] {
            assert_eq!(
                EcParameter::from_curve_description(&unsupported),
                Err(Error::UnsupportedCurve)
            );
        }
        assert!(EcParameter::try_from(&CurveDescription::Implicit).is_err());
    }

    #[test]
    fn key_parameters_round_trip() {
        let params = Arc::new(toy_params());
        let pair = EcKeyPair {
            d: SecretScalar::new(BigUint::from(3u32)),
            q: AffinePoint::new(BigUint::from(80u32), BigUint::from(10u32)),
            params: Some(params.clone()),
        };

        let record = pair.to_key_parameters();
        assert_eq!(record.d.as_deref().map(Vec::as_slice), Some(&[3u8][..]));

        let imported = EcKeyPair::from_key_parameters(&record).expect("valid");
        assert_eq!(imported.d.expose(), pair.d.expose());
        assert_eq!(imported.q, pair.q);
        assert_eq!(imported.params.as_deref(), Some(&*params));

        let public = EcKeyPair {
            d: SecretScalar::default(),
            q: pair.q.clone(),
            params: None,
        };
        let record = public.to_key_parameters();
        assert!(record.d.is_none());
        assert_eq!(record.curve, CurveDescription::Implicit);
        assert!(!EcKeyPair::from_key_parameters(&record).expect("valid").has_private_key());
    }
}
