/*
    Elliptic curve operations needed by key derivation.

    Keys move through the library as plain bytes: private keys as
    `Scalar256` and public keys as 33 byte compressed points. A curve
    implementation only has to turn those into its own representation
    to do point arithmetic, so the rest of the crate never depends on a
    particular curve library.
*/

use crate::{
    error::{KeyError, KeyResult},
    scalar::{Scalar256, CURVE_ORDER},
};
use secp256k1::{All, PublicKey, Scalar, Secp256k1, SecretKey};
use std::fmt;

/// Length of a compressed curve point.
pub const COMPRESSED_POINT_LEN: usize = 33;

pub type CompressedPoint = [u8; COMPRESSED_POINT_LEN];

/**
    Point arithmetic over a prime order curve.

    Implementations are shared between keys behind an `Arc`, so they must
    be safe to use from several threads.
*/
pub trait CurvePointOps: Send + Sync {
    /// Order `n` of the base point G.
    fn order(&self) -> Scalar256;

    /// `k·G` for a scalar in `[1, n-1]`.
    fn multiply_generator(&self, k: &Scalar256) -> KeyResult<CompressedPoint>;

    /// `k·P` for an arbitrary point `P`.
    fn multiply_point(&self, point: &CompressedPoint, k: &Scalar256) -> KeyResult<CompressedPoint>;

    /// `p + q`. Fails when the sum is the point at infinity.
    fn add_points(&self, p: &CompressedPoint, q: &CompressedPoint) -> KeyResult<CompressedPoint>;

    /// True when `point` is a valid compressed encoding of a point on the curve.
    fn is_on_curve(&self, point: &[u8]) -> bool;

    /// Name used in debug output.
    fn name(&self) -> &'static str;
}

/// secp256k1, backed by libsecp256k1.
pub struct Secp256k1Curve {
    ctx: Secp256k1<All>,
}

impl Secp256k1Curve {
    pub fn new() -> Self {
        Self { ctx: Secp256k1::new() }
    }

    fn public_key(point: &[u8]) -> KeyResult<PublicKey> {
        if point.len() != COMPRESSED_POINT_LEN {
            return Err(KeyError::InvalidKeyLength(point.len()));
        }
        PublicKey::from_slice(point).map_err(|_| KeyError::PointNotOnCurve)
    }
}

impl Default for Secp256k1Curve {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Secp256k1Curve {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Secp256k1Curve").finish()
    }
}

impl CurvePointOps for Secp256k1Curve {
    fn order(&self) -> Scalar256 {
        CURVE_ORDER
    }

    fn multiply_generator(&self, k: &Scalar256) -> KeyResult<CompressedPoint> {
        let secret = SecretKey::from_slice(&k.to_be_bytes()).map_err(|_| KeyError::UnusableScalar)?;
        Ok(PublicKey::from_secret_key(&self.ctx, &secret).serialize())
    }

    fn multiply_point(&self, point: &CompressedPoint, k: &Scalar256) -> KeyResult<CompressedPoint> {
        let p = Self::public_key(point)?;
        let tweak = Scalar::from_be_bytes(k.to_be_bytes()).map_err(|_| KeyError::UnusableScalar)?;
        let product = p.mul_tweak(&self.ctx, &tweak).map_err(|_| KeyError::UnusableScalar)?;
        Ok(product.serialize())
    }

    fn add_points(&self, p: &CompressedPoint, q: &CompressedPoint) -> KeyResult<CompressedPoint> {
        let p = Self::public_key(p)?;
        let q = Self::public_key(q)?;
        //combine only fails on the point at infinity
        let sum = p.combine(&q).map_err(|_| KeyError::UnusableScalar)?;
        Ok(sum.serialize())
    }

    fn is_on_curve(&self, point: &[u8]) -> bool {
        Self::public_key(point).is_ok()
    }

    fn name(&self) -> &'static str {
        "secp256k1"
    }
}
