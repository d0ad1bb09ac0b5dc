/*
    Base58 and Base58Check encoding.

    The alphabet and the checksum hash come from the network the data
    belongs to, so the same payload check encodes differently on a
    Decred network (double BLAKE-256) and a Bitcoin style network
    (double SHA-256).
*/

use crate::{
    error::{KeyError, KeyResult},
    network::{KeyHash, NetworkProfile, CHECKSUM_LEN},
};
use log::trace;

#[derive(Debug)]
pub struct Base58<'a> {
    network: &'a NetworkProfile,
    prefix: Vec<u8>,
    payload: Vec<u8>,
}

impl<'a> Base58<'a> {
    /**
        Data to encode under `network`. `prefix` is written in front of the
        payload and is covered by the checksum.
    */
    pub fn new(network: &'a NetworkProfile, prefix: &[u8], payload: &[u8]) -> Self {
        Self {
            network,
            prefix: prefix.to_vec(),
            payload: payload.to_vec(),
        }
    }

    fn bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.prefix.len() + self.payload.len() + CHECKSUM_LEN);
        bytes.extend_from_slice(&self.prefix);
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    /// Check encode data by appending the checksum and then encoding it.
    pub fn check_encode(&self) -> KeyResult<String> {
        let mut bytes = self.bytes();
        let checksum = self.network.key_hash().checksum(&bytes);
        bytes.extend_from_slice(&checksum);

        encode_with(self.network, &bytes)
    }

    /// Encode data in base58 format.
    pub fn encode(&self) -> KeyResult<String> {
        encode_with(self.network, &self.bytes())
    }

    /**
        Decodes a base58 string into a byte vector.
        Does NOT remove the checksum or version prefix if present.
    */
    pub fn decode(network: &NetworkProfile, encoded: &str) -> KeyResult<Vec<u8>> {
        let alphabet = network.alphabet()?;
        Ok(bs58::decode(encoded).with_alphabet(&alphabet).into_vec()?)
    }

    /**
        Returns the decoded data with the checksum removed after checking it
        with the hash of `network`. The version prefix is NOT removed as its
        length depends on context.
    */
    pub fn check_decode(network: &NetworkProfile, encoded: &str) -> KeyResult<Vec<u8>> {
        let mut bytes = Self::decode(network, encoded)?;
        if !validate_checksum(&bytes, network.key_hash()) {
            return Err(KeyError::ChecksumMismatch);
        }
        bytes.truncate(bytes.len() - CHECKSUM_LEN);
        Ok(bytes)
    }
}

fn encode_with(network: &NetworkProfile, bytes: &[u8]) -> KeyResult<String> {
    let alphabet = network.alphabet()?;
    Ok(bs58::encode(bytes).with_alphabet(&alphabet).into_string())
}

/**
    True when the last four bytes of `bytes` are the checksum of the rest
    under `key_hash`. Data too short to hold a checksum never validates.
*/
pub fn validate_checksum(bytes: &[u8], key_hash: KeyHash) -> bool {
    if bytes.len() < CHECKSUM_LEN {
        return false;
    }
    let (data, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    let valid = key_hash.checksum(data) == checksum;
    if !valid {
        trace!("checksum mismatch under {:?}", key_hash);
    }
    valid
}
