//! SM2 context: domain parameters, identity and key material.

use core::{
    cell::{OnceCell, RefCell},
    fmt::{self, Debug},
    marker::PhantomData,
};
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::{CryptoRngCore, OsRng};
use sm3::{
    Sm3,
    digest::{Digest, FixedOutputReset, Output},
};
use weierstrass::{
    AffinePoint, EcKeyPair, EcParameter, JacobianPoint, PointFormat, SecretScalar,
    random_in_range,
};

use crate::{Error, MAX_DISTID_LEN, Result, distid::hash_z, recommended_params};

/// SM2 context.
///
/// Owns the active domain parameters, a random number generator, the
/// distinguishing identifier used for `Z` and an optional key pair. The `Z`
/// value is computed on first use and discarded whenever the identifier,
/// the key pair or the parameters change.
///
/// The context uses interior mutability for its random number generator
/// and `Z` cache and is therefore neither [`Sync`] nor re-entrant.
pub struct Sm2<D: Digest = Sm3, R = OsRng> {
    params: Arc<EcParameter>,
    rng: RefCell<R>,
    distid: Vec<u8>,
    secret: SecretScalar,
    public: AffinePoint,
    z: OnceCell<Output<D>>,

    /// `2^(11·bitlen(n)/16)`: ephemeral and private scalars are drawn from
    /// `[pk_bound, n - pk_bound)`.
    pk_bound: BigUint,
    digest: PhantomData<D>,
}

impl Sm2 {
    /// Create a context over the SM2 recommended curve using SM3 and the
    /// operating system's random number generator.
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }
}

impl Default for Sm2 {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, R> Sm2<D, R>
where
    D: Digest + FixedOutputReset,
    R: CryptoRngCore,
{
    /// Create a context over the SM2 recommended curve.
    pub fn with_rng(rng: R) -> Self {
        Self::with_params(recommended_params(), rng)
    }

    /// Create a context over the given domain parameters.
    pub fn with_params(params: Arc<EcParameter>, rng: R) -> Self {
        Self {
            pk_bound: pk_bound(&params),
            params,
            rng: RefCell::new(rng),
            distid: Vec::new(),
            secret: SecretScalar::default(),
            public: AffinePoint::identity(),
            z: OnceCell::new(),
            digest: PhantomData,
        }
    }

    /// Active domain parameters.
    pub fn params(&self) -> &Arc<EcParameter> {
        &self.params
    }

    /// Bit length of the group order.
    pub fn key_size(&self) -> u64 {
        self.params.bits()
    }

    /// Distinguishing identifier.
    pub fn distid(&self) -> &[u8] {
        &self.distid
    }

    /// Set the distinguishing identifier.
    ///
    /// At most [`MAX_DISTID_LEN`] bytes.
    pub fn set_distid(&mut self, distid: &[u8]) -> Result<()> {
        if distid.len() > MAX_DISTID_LEN {
            return Err(Error::IdentityTooLong);
        }

        self.distid = distid.to_vec();
        self.z.take();
        Ok(())
    }

    /// Is a private key loaded?
    pub fn has_private_key(&self) -> bool {
        !self.secret.is_zero()
    }

    /// Is a public key loaded?
    pub fn has_public_key(&self) -> bool {
        !self.public.is_identity()
    }

    /// Public key, or the point at infinity if none is loaded.
    pub fn public_key(&self) -> &AffinePoint {
        &self.public
    }

    /// Generate and load a key pair.
    pub fn generate_key_pair(&mut self) -> EcKeyPair {
        let d = self.random_scalar();
        self.load_private_key(d);
        self.export_key()
    }

    /// Load a private key and derive its public key.
    ///
    /// `d` must lie in `[1, n - 2]`.
    pub fn import_private_key(&mut self, d: &BigUint) -> Result<()> {
        if d.is_zero() || d >= &(self.params.order() - 1u32) {
            return Err(Error::InvalidPrivateKey);
        }

        self.load_private_key(SecretScalar::new(d.clone()));
        Ok(())
    }

    /// Load a public key.
    ///
    /// A loaded private key is kept only if it belongs to `q`.
    pub fn import_public_key(&mut self, q: &AffinePoint) -> Result<()> {
        self.params.curve().validate_point(q)?;

        if &self.public != q {
            self.secret = SecretScalar::default();
        }

        self.public = q.clone();
        self.z.take();
        Ok(())
    }

    /// Load a key pair, switching to its domain parameters if it has any.
    ///
    /// The private key takes precedence: when present the public key is
    /// derived from it rather than taken from the pair.
    pub fn import_key(&mut self, pair: &EcKeyPair) -> Result<()> {
        if let Some(params) = &pair.params {
            self.change_params(Arc::clone(params));
        }

        if pair.has_private_key() {
            return self.import_private_key(pair.d.expose());
        }

        if pair.has_public_key() {
            return self.import_public_key(&pair.q);
        }

        Err(Error::MissingKey)
    }

    /// Export the loaded key pair along with the active parameters.
    pub fn export_key(&self) -> EcKeyPair {
        EcKeyPair {
            d: self.secret.clone(),
            q: self.public.clone(),
            params: Some(Arc::clone(&self.params)),
        }
    }

    /// `Z` value for the loaded public key and identifier.
    pub fn z_value(&self) -> Result<&Output<D>> {
        if let Some(z) = self.z.get() {
            return Ok(z);
        }

        let z = hash_z::<D>(&self.params, &self.distid, &self.public)?;
        Ok(self.z.get_or_init(|| z))
    }

    /// Parse a point from the front of `bytes`, returning it along with the
    /// number of bytes consumed.
    pub fn decode_point(&self, bytes: &[u8]) -> Result<(AffinePoint, usize)> {
        let mut rng = self.rng.borrow_mut();
        Ok(self.params.curve().decode_point(bytes, &mut *rng)?)
    }

    /// Serialize a point.
    pub fn encode_point(&self, point: &AffinePoint, format: PointFormat) -> Result<Vec<u8>> {
        Ok(self.params.curve().encode_point(point, format)?)
    }

    fn change_params(&mut self, params: Arc<EcParameter>) {
        self.pk_bound = pk_bound(&params);
        self.params = params;
        self.secret = SecretScalar::default();
        self.public = AffinePoint::identity();
        self.z.take();
    }

    fn load_private_key(&mut self, d: SecretScalar) {
        let g = JacobianPoint::from(self.params.generator());
        self.public = self.mul(d.expose(), &g);
        self.secret = d;
        self.z.take();
    }

    pub(crate) fn secret(&self) -> Result<&BigUint> {
        if self.secret.is_zero() {
            return Err(Error::MissingPrivateKey);
        }
        Ok(self.secret.expose())
    }

    pub(crate) fn public(&self) -> Result<&AffinePoint> {
        if self.public.is_identity() {
            return Err(Error::MissingPublicKey);
        }
        Ok(&self.public)
    }

    /// Uniform scalar in `[pk_bound, n - pk_bound)`.
    pub(crate) fn random_scalar(&self) -> SecretScalar {
        let hi = self.params.order() - &self.pk_bound;
        let mut rng = self.rng.borrow_mut();
        SecretScalar::new(random_in_range(&mut *rng, &self.pk_bound, &hi))
    }

    /// `k·P` in affine coordinates.
    pub(crate) fn mul(&self, k: &BigUint, point: &JacobianPoint) -> AffinePoint {
        let curve = self.params.curve();
        let mut rng = self.rng.borrow_mut();
        curve.to_affine(&curve.mul(k, point, &mut *rng))
    }

    /// `k·P + m·S` in affine coordinates.
    pub(crate) fn mul_add(
        &self,
        k: &BigUint,
        p: &JacobianPoint,
        m: &BigUint,
        s: &JacobianPoint,
    ) -> AffinePoint {
        let curve = self.params.curve();
        let mut rng = self.rng.borrow_mut();
        curve.to_affine(&curve.mul_add(k, p, m, s, &mut *rng))
    }

    /// Is `[h]P` the point at infinity?
    pub(crate) fn in_small_subgroup(&self, point: &AffinePoint) -> bool {
        self.mul(self.params.cofactor(), &JacobianPoint::from(point))
            .is_identity()
    }

    /// `H(data[0] || data[1] || ...)`
    pub(crate) fn digest<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Output<D> {
        let mut hasher = D::new();
        for part in parts {
            Digest::update(&mut hasher, part);
        }
        hasher.finalize()
    }
}

impl<D: Digest, R> Debug for Sm2<D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sm2")
            .field("params", &self.params)
            .field("distid", &self.distid)
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

fn pk_bound(params: &EcParameter) -> BigUint {
    BigUint::one() << (params.order().bits() * 11 / 16)
}
