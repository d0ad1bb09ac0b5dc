/*
    This module implements child key deriveration
    from parent extended private and public keys
    under the BIP32 standard.

    Reference:
        https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki
*/

use crate::{
    error::{KeyError, KeyField, KeyResult},
    hash::hmac_sha512,
    hdwallet::{
        extended_keys::KeyMaterial,
        ExtendedKey,
        HARDENED_KEY_START,
    },
    key::{PrivKey, PubKey},
    scalar::Scalar256,
};
use log::trace;
use zeroize::Zeroize;

/**
    Enum to pattern match child key deriveration options.
    Both variants hold the index below 2^31; `Hardened(i)` derives index 2^31 + i.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOptions {
    Normal(u32),
    Hardened(u32),
}

impl ChildOptions {
    /// Splits a full 32 bit index into its hardened flag and offset.
    pub fn from_index(index: u32) -> Self {
        if index >= HARDENED_KEY_START {
            ChildOptions::Hardened(index - HARDENED_KEY_START)
        } else {
            ChildOptions::Normal(index)
        }
    }

    /// The full 32 bit index this option derives.
    pub fn index(&self) -> KeyResult<u32> {
        match *self {
            ChildOptions::Normal(i) | ChildOptions::Hardened(i) if i >= HARDENED_KEY_START => {
                Err(KeyError::InvalidFieldRange {
                    field: KeyField::ChildIndex,
                    detail: format!("expected an index below 2^31, found {}", i),
                })
            }
            ChildOptions::Normal(i) => Ok(i),
            ChildOptions::Hardened(i) => Ok(i + HARDENED_KEY_START),
        }
    }

    pub fn is_hardened(&self) -> bool {
        matches!(self, ChildOptions::Hardened(_))
    }
}

/**
    HMAC-SHA512 of `data` keyed by the parent chain code, split into the
    left half as a scalar and the right half as the child chain code.
    Fails when the left half is zero or not below the curve order.
*/
fn child_tweak(parent: &ExtendedKey, data: &[u8]) -> KeyResult<(Scalar256, [u8; 32])> {
    let mut i = hmac_sha512(data, &parent.chain_code())?;

    let mut left = [0u8; 32];
    left.copy_from_slice(&i[..32]);
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&i[32..]);

    let tweak = Scalar256::from_be_bytes(&left);
    left.zeroize();
    i.zeroize();

    if tweak.is_zero() || tweak >= parent.curve().order() {
        return Err(KeyError::UnusableScalar);
    }
    Ok((tweak, chain_code))
}

/**
    Function to derive a child extended private key from a parent extended private key.
    Indexes of 2^31 and above derive hardened children.
*/
pub fn derive_private_child(parent: &ExtendedKey, index: u32) -> KeyResult<ExtendedKey> {
    let hardened = index >= HARDENED_KEY_START;
    let key: &PrivKey = match parent.private_key() {
        Ok(key) => key,
        Err(_) if hardened => return Err(KeyError::HardenedFromPublicKey),
        Err(e) => return Err(e),
    };

    //Hardened child is [0x00 || parent priv bytes || index bytes]
    //Normal child is [parent pub bytes || index bytes]
    let mut data: Vec<u8> = Vec::with_capacity(37);
    if hardened {
        data.push(0x00);
        data.extend_from_slice(&key.as_bytes());
    } else {
        data.extend_from_slice(&parent.public_key()?.as_bytes());
    }
    data.extend_from_slice(&index.to_be_bytes());

    let tweak = child_tweak(parent, &data);
    data.zeroize();
    let (tweak, chain_code) = tweak?;

    let curve = parent.curve();
    let child_scalar = tweak.add_mod(key.scalar(), &curve.order());
    let child_key = PrivKey::from_scalar(child_scalar, curve.as_ref())?;

    trace!("derived private child {} at depth {}", index, parent.depth() as u32 + 1);
    parent.child(KeyMaterial::private(child_key), chain_code, index)
}

/**
    Function to derive a child extended public key.

    A public-only parent can not derive hardened children. A private parent
    derives from its public key, as a public parent would.
*/
pub fn derive_public_child(parent: &ExtendedKey, index: u32) -> KeyResult<ExtendedKey> {
    if !parent.is_private() && index >= HARDENED_KEY_START {
        return Err(KeyError::HardenedFromPublicKey);
    }

    let parent_key: PubKey = parent.public_key()?;
    let mut data: Vec<u8> = Vec::with_capacity(37);
    data.extend_from_slice(&parent_key.as_bytes());
    data.extend_from_slice(&index.to_be_bytes());

    let (tweak, chain_code) = child_tweak(parent, &data)?;

    //child = point(IL) + parent point
    let curve = parent.curve();
    let point = curve.add_points(&curve.multiply_generator(&tweak)?, &parent_key.as_bytes())?;

    trace!("derived public child {} at depth {}", index, parent.depth() as u32 + 1);
    parent.child(KeyMaterial::Public(PubKey::from_point(point)), chain_code, index)
}
