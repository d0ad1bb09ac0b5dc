/*
    Plain (non extended) keys.

    A `PrivKey` is a scalar in [1, n-1] and is wiped from memory when
    dropped. A `PubKey` is a compressed curve point that has been checked
    to lie on the curve it was built against.
*/

use crate::{
    curve::{CompressedPoint, CurvePointOps, COMPRESSED_POINT_LEN},
    error::{KeyError, KeyResult},
    hash,
    network::KeyHash,
    scalar::Scalar256,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a serialized private key.
pub const PRIVATE_KEY_LEN: usize = 32;

#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivKey(Scalar256);

impl PrivKey {
    /**
        Use a 32 byte big-endian scalar as a private key.
        Fails with UnusableScalar when the value is zero or not below the curve order.
    */
    pub fn from_slice(bytes: &[u8], curve: &dyn CurvePointOps) -> KeyResult<Self> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(KeyError::InvalidKeyLength(bytes.len()));
        }
        let mut raw = [0u8; PRIVATE_KEY_LEN];
        raw.copy_from_slice(bytes);
        let scalar = Scalar256::from_be_bytes(&raw);
        raw.zeroize();

        Self::from_scalar(scalar, curve)
    }

    pub(crate) fn from_scalar(scalar: Scalar256, curve: &dyn CurvePointOps) -> KeyResult<Self> {
        if scalar.is_zero() || scalar >= curve.order() {
            return Err(KeyError::UnusableScalar);
        }
        Ok(Self(scalar))
    }

    pub(crate) fn scalar(&self) -> &Scalar256 {
        &self.0
    }

    /**
        Serializes the private key into an array of bytes.
    */
    pub fn as_bytes(&self) -> [u8; PRIVATE_KEY_LEN] {
        self.0.to_be_bytes()
    }

    /**
        Finds the compressed public key of this private key.

        Is the result of the generator G of the curve multiplied k times, where k is the private key.
    */
    pub fn public_key(&self, curve: &dyn CurvePointOps) -> KeyResult<PubKey> {
        Ok(PubKey(curve.multiply_generator(&self.0)?))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PubKey(CompressedPoint);

impl PubKey {
    /**
        Use a compressed point as a public key.
        The point must lie on `curve`.
    */
    pub fn from_slice(bytes: &[u8], curve: &dyn CurvePointOps) -> KeyResult<Self> {
        if bytes.len() != COMPRESSED_POINT_LEN {
            return Err(KeyError::InvalidKeyLength(bytes.len()));
        }
        if !curve.is_on_curve(bytes) {
            return Err(KeyError::PointNotOnCurve);
        }
        let mut point = [0u8; COMPRESSED_POINT_LEN];
        point.copy_from_slice(bytes);
        Ok(Self(point))
    }

    pub(crate) fn from_point(point: CompressedPoint) -> Self {
        Self(point)
    }

    /**
        Returns the compressed public key as a byte array.
    */
    pub fn as_bytes(&self) -> CompressedPoint {
        self.0
    }

    /**
       Return the compressed public key as a hex string.
    */
    pub fn as_hex(&self) -> String {
        hex::encode(self.0)
    }

    /**
        ripemd160 of the network hash of the compressed key.
        Used for both key fingerprints and pay-to-pubkey-hash addresses.
    */
    pub fn hash160(&self, key_hash: KeyHash) -> [u8; 20] {
        hash::ripemd160(key_hash.digest(&self.0))
    }
}
