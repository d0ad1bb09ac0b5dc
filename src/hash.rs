/*
    Hash module include hash functions necessary to derive keys
    and hash a public key into an address.
*/

use crate::{
    blake::BlakeState,
    error::{KeyError, KeyResult},
};
use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

/*
    Returns the BLAKE-256 hash of the input
*/
pub fn blake256<T>(input: T) -> [u8; 32]
where T: AsRef<[u8]>
{
    BlakeState::digest(input.as_ref())
}

/*
    Returns the SHA-256 hash of the input
*/
pub fn sha256<T>(input: T) -> [u8; 32]
where T: AsRef<[u8]>
{
    let mut r = Sha256::new();
    r.update(input);
    let mut out = [0u8; 32];
    out.copy_from_slice(&r.finalize());
    out
}

/*
    Returns the RIPEMD-160 hash of the input
*/
pub fn ripemd160<T>(input: T) -> [u8; 20]
where T: AsRef<[u8]>
{
    let mut r = Ripemd160::new();
    r.update(input);
    let mut out = [0u8; 20];
    out.copy_from_slice(&r.finalize());
    out
}

/*
    HMAC-SHA512 of `data` keyed with `key`
*/
pub fn hmac_sha512(data: &[u8], key: &[u8]) -> KeyResult<[u8; 64]> {
    let mut mac = Hmac::<Sha512>::new_from_slice(key).map_err(|_| KeyError::InvalidKeyLength(key.len()))?;
    mac.update(data);
    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}
