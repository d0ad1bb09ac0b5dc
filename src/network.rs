/*
    Network profiles.

    A profile carries everything that differs between networks: the
    version bytes of serialized extended keys, the version bytes of
    pay-to-pubkey-hash addresses, the hash used for checksums and key
    identifiers, and the Base58 alphabet.
*/

use crate::{
    error::{KeyError, KeyResult},
    hash,
};
use std::str::FromStr;

/// The standard Bitcoin style alphabet, which leaves out `0`, `O`, `I` and `l`.
pub const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length of a Base58Check checksum.
pub const CHECKSUM_LEN: usize = 4;

/**
    Hash applied to public keys and checksummed payloads.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyHash {
    Blake256,
    Sha256,
}

impl KeyHash {
    pub const ALL: [KeyHash; 2] = [KeyHash::Blake256, KeyHash::Sha256];

    pub fn digest(&self, data: &[u8]) -> [u8; 32] {
        match self {
            KeyHash::Blake256 => hash::blake256(data),
            KeyHash::Sha256 => hash::sha256(data),
        }
    }

    /// First four bytes of the hash applied twice.
    pub fn checksum(&self, payload: &[u8]) -> [u8; CHECKSUM_LEN] {
        let mut checksum = [0u8; CHECKSUM_LEN];
        checksum.copy_from_slice(&self.digest(&self.digest(payload))[..CHECKSUM_LEN]);
        checksum
    }
}

/**
    Parameters of a caller defined network.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkParams {
    name: String,
    hd_private_version: [u8; 4],
    hd_public_version: [u8; 4],
    pubkey_hash_addr_id: Vec<u8>,
    key_hash: KeyHash,
    alphabet: [u8; 58],
}

impl NetworkParams {
    /**
        Creates network parameters with the standard Base58 alphabet.
        The address id must be one or two bytes.
    */
    pub fn new(
        name: &str,
        hd_private_version: [u8; 4],
        hd_public_version: [u8; 4],
        pubkey_hash_addr_id: &[u8],
        key_hash: KeyHash,
    ) -> KeyResult<Self> {
        if pubkey_hash_addr_id.is_empty() || pubkey_hash_addr_id.len() > 2 {
            return Err(KeyError::InvalidKeyLength(pubkey_hash_addr_id.len()));
        }

        Ok(Self {
            name: name.to_string(),
            hd_private_version,
            hd_public_version,
            pubkey_hash_addr_id: pubkey_hash_addr_id.to_vec(),
            key_hash,
            alphabet: *BASE58_ALPHABET,
        })
    }

    /// Replaces the Base58 alphabet. The alphabet must be 58 distinct ASCII characters.
    pub fn with_alphabet(mut self, alphabet: &[u8]) -> KeyResult<Self> {
        if alphabet.len() != 58 {
            return Err(KeyError::InvalidAlphabet(format!(
                "expected 58 characters, found {}",
                alphabet.len()
            )));
        }
        let mut table = [0u8; 58];
        table.copy_from_slice(alphabet);
        bs58::Alphabet::new(&table).map_err(|e| KeyError::InvalidAlphabet(e.to_string()))?;

        self.alphabet = table;
        Ok(self)
    }
}

/**
    Network a key or address belongs to.

    MainNet and TestNet are the Decred networks; anything else is
    described by `NetworkParams`.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkProfile {
    MainNet,
    TestNet,
    Custom(NetworkParams),
}

impl NetworkProfile {
    /// Networks tried when decoding a serialized key without an explicit candidate list.
    pub fn builtin() -> [NetworkProfile; 2] {
        [NetworkProfile::MainNet, NetworkProfile::TestNet]
    }

    pub fn name(&self) -> &str {
        match self {
            NetworkProfile::MainNet => "mainnet",
            NetworkProfile::TestNet => "testnet",
            NetworkProfile::Custom(p) => &p.name,
        }
    }

    /// "dprv" on MainNet, "tprv" on TestNet.
    pub fn hd_private_version(&self) -> [u8; 4] {
        match self {
            NetworkProfile::MainNet => [0x02, 0xfd, 0xa4, 0xe8],
            NetworkProfile::TestNet => [0x04, 0x35, 0x83, 0x97],
            NetworkProfile::Custom(p) => p.hd_private_version,
        }
    }

    /// "dpub" on MainNet, "tpub" on TestNet.
    pub fn hd_public_version(&self) -> [u8; 4] {
        match self {
            NetworkProfile::MainNet => [0x02, 0xfd, 0xa9, 0x26],
            NetworkProfile::TestNet => [0x04, 0x35, 0x87, 0xd1],
            NetworkProfile::Custom(p) => p.hd_public_version,
        }
    }

    /// "Ds" on MainNet, "Ts" on TestNet.
    pub fn pubkey_hash_addr_id(&self) -> &[u8] {
        match self {
            NetworkProfile::MainNet => &[0x07, 0x3f],
            NetworkProfile::TestNet => &[0x0f, 0x21],
            NetworkProfile::Custom(p) => &p.pubkey_hash_addr_id,
        }
    }

    pub fn key_hash(&self) -> KeyHash {
        match self {
            NetworkProfile::MainNet | NetworkProfile::TestNet => KeyHash::Blake256,
            NetworkProfile::Custom(p) => p.key_hash,
        }
    }

    pub fn alphabet_bytes(&self) -> &[u8; 58] {
        match self {
            NetworkProfile::MainNet | NetworkProfile::TestNet => BASE58_ALPHABET,
            NetworkProfile::Custom(p) => &p.alphabet,
        }
    }

    pub fn alphabet(&self) -> KeyResult<bs58::Alphabet> {
        bs58::Alphabet::new(self.alphabet_bytes()).map_err(|e| KeyError::InvalidAlphabet(e.to_string()))
    }

    /**
        Returns Some(true) for this network's private version,
        Some(false) for its public version and None otherwise.
    */
    pub fn match_hd_version(&self, version: &[u8]) -> Option<bool> {
        if version == self.hd_private_version() {
            Some(true)
        } else if version == self.hd_public_version() {
            Some(false)
        } else {
            None
        }
    }

    /**
        Finds the network among `candidates` whose extended key versions include `version`.
        Returns the network and whether the version marks a private key.
    */
    pub fn from_hd_version<'a>(version: &[u8], candidates: &'a [NetworkProfile]) -> Option<(&'a NetworkProfile, bool)> {
        candidates
            .iter()
            .find_map(|network| network.match_hd_version(version).map(|private| (network, private)))
    }
}

impl Default for NetworkProfile {
    fn default() -> Self {
        NetworkProfile::MainNet
    }
}

impl FromStr for NetworkProfile {
    type Err = KeyError;

    fn from_str(s: &str) -> KeyResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(NetworkProfile::MainNet),
            "testnet" | "test" | "testnet3" => Ok(NetworkProfile::TestNet),
            _ => Err(KeyError::UnknownNetwork(s.to_string())),
        }
    }
}
