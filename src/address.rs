use crate::{
    encoding::Base58,
    error::{KeyError, KeyResult},
    hdwallet::ExtendedKey,
    key::PubKey,
    network::NetworkProfile,
};

/// Length of the public key hash carried by an address.
pub const HASH160_LEN: usize = 20;

pub struct Address;

impl Address {
    /**
        Creates a pay-to-pubkey-hash address from a public key.
        * Base58Check( address id || Ripemd160( hash( Public Key ) ) )
        where the hash and the address id come from the network.
    */
    pub fn from_pub_key(pk: &PubKey, network: &NetworkProfile) -> KeyResult<String> {
        let hash = pk.hash160(network.key_hash());
        Base58::new(network, network.pubkey_hash_addr_id(), &hash).check_encode()
    }

    /**
        Address of the public key of an extended key, on the key's network.
    */
    pub fn from_key(key: &ExtendedKey) -> KeyResult<String> {
        Self::from_pub_key(&key.public_key()?, key.network())
    }

    /**
        Decodes an address of one of `candidates` into its network and the
        hash160 of the public key it pays to.
    */
    pub fn decode<'a>(address: &str, candidates: &'a [NetworkProfile]) -> KeyResult<(&'a NetworkProfile, [u8; HASH160_LEN])> {
        let mut failure: Option<KeyError> = None;

        for network in candidates {
            let id = network.pubkey_hash_addr_id();
            let bytes = match Base58::check_decode(network, address) {
                Ok(bytes) => bytes,
                Err(e) => {
                    failure.get_or_insert(e);
                    continue;
                }
            };
            if bytes.len() != id.len() + HASH160_LEN {
                failure.get_or_insert(KeyError::MalformedPayloadLength {
                    expected: id.len() + HASH160_LEN,
                    found: bytes.len(),
                });
                continue;
            }
            if &bytes[..id.len()] != id {
                failure.get_or_insert(KeyError::UnknownVersion(bytes[..id.len()].to_vec()));
                continue;
            }

            let mut hash = [0u8; HASH160_LEN];
            hash.copy_from_slice(&bytes[id.len()..]);
            return Ok((network, hash));
        }

        Err(failure.unwrap_or_else(|| KeyError::UnknownVersion(Vec::new())))
    }

    /// True when `address` is a well formed address of `network`.
    pub fn is_valid(address: &str, network: &NetworkProfile) -> bool {
        Self::decode(address, std::slice::from_ref(network)).is_ok()
    }
}
