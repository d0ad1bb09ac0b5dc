/*
    Fixed width 256 bit unsigned integer used for private key arithmetic.

    Only what key derivation needs is implemented: conversion from and to
    big-endian bytes, comparison, zero test and addition modulo the group
    order of the curve.
*/

use std::cmp::Ordering;
use zeroize::Zeroize;

/// Order of the secp256k1 base point.
pub const CURVE_ORDER: Scalar256 = Scalar256([
    0xFFFF_FFFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF_FFFE,
    0xBAAE_DCE6_AF48_A03B,
    0xBFD2_5E8C_D036_4141,
]);

/// Limbs are stored most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Zeroize)]
pub struct Scalar256([u64; 4]);

impl Scalar256 {
    pub const ZERO: Scalar256 = Scalar256([0; 4]);

    pub fn from_be_bytes(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *limb = u64::from_be_bytes(word);
        }
        Self(limbs)
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for (chunk, limb) in bytes.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&limb.to_be_bytes());
        }
        bytes
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|limb| *limb == 0)
    }

    /**
        Returns (self + other) mod modulus.
        Both operands must already be reduced below the modulus.
    */
    pub fn add_mod(&self, other: &Scalar256, modulus: &Scalar256) -> Scalar256 {
        let (sum, carry) = self.overflowing_add(other);
        if carry || sum >= *modulus {
            sum.wrapping_sub(modulus)
        } else {
            sum
        }
    }

    fn overflowing_add(&self, other: &Scalar256) -> (Scalar256, bool) {
        let mut out = [0u64; 4];
        let mut carry = false;
        for i in (0..4).rev() {
            let (s1, c1) = self.0[i].overflowing_add(other.0[i]);
            let (s2, c2) = s1.overflowing_add(carry as u64);
            out[i] = s2;
            carry = c1 || c2;
        }
        (Scalar256(out), carry)
    }

    fn wrapping_sub(&self, other: &Scalar256) -> Scalar256 {
        let mut out = [0u64; 4];
        let mut borrow = false;
        for i in (0..4).rev() {
            let (d1, b1) = self.0[i].overflowing_sub(other.0[i]);
            let (d2, b2) = d1.overflowing_sub(borrow as u64);
            out[i] = d2;
            borrow = b1 || b2;
        }
        Scalar256(out)
    }
}

impl PartialOrd for Scalar256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scalar256 {
    //Most significant limb first, so lexicographic order is numeric order
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}
