/*
    This module implements extended keys that are
    used in BIP32 hierarchal deterministic wallets.

    An extended key is a private scalar or a public point together with
    a 32 byte chaincode and the position of the key in the tree (depth,
    parent fingerprint and child index). Keys are immutable; every
    derivation returns a new key sharing the network and curve of its
    parent.

    Serialized layout (82 bytes before Base58 encoding):
        version (4) || depth (1) || parent fingerprint (4) ||
        child index (4) || chaincode (32) || key data (33) || checksum (4)
*/

use crate::{
    address::Address,
    curve::{CurvePointOps, COMPRESSED_POINT_LEN},
    encoding::base58::{validate_checksum, Base58},
    error::{KeyError, KeyField, KeyResult},
    hash,
    hdwallet::{
        ckd::{derive_private_child, derive_public_child, ChildOptions},
        Path,
        BIP44_PURPOSE,
        EXTERNAL_BRANCH,
        HARDENED_KEY_START,
        INTERNAL_BRANCH,
        MASTER_KEY,
        MAX_ACCOUNT_NUM,
        MAX_COIN_TYPE,
        MAX_SEED_BYTES,
        MIN_SEED_BYTES,
    },
    key::{PrivKey, PubKey, PRIVATE_KEY_LEN},
    network::{KeyHash, NetworkProfile},
};
use log::debug;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use zeroize::Zeroize;

/// Length of the serialized key before the checksum.
pub const PAYLOAD_LEN: usize = 78;

/// Length of the decoded Base58 text, checksum included.
pub const SERIALIZED_LEN: usize = 82;

const CHAIN_CODE_LEN: usize = 32;
const KEY_DATA_START: usize = 45;

/**
    Key half of an extended key. The public key of a private key is
    computed on first use and kept.
*/
#[derive(Clone)]
pub(crate) enum KeyMaterial {
    Private { key: PrivKey, public: OnceCell<PubKey> },
    Public(PubKey),
}

impl KeyMaterial {
    pub(crate) fn private(key: PrivKey) -> Self {
        KeyMaterial::Private { key, public: OnceCell::new() }
    }

    /// The 33 byte key field of the serialized form.
    fn key_data(&self) -> [u8; COMPRESSED_POINT_LEN] {
        let mut data = [0u8; COMPRESSED_POINT_LEN];
        match self {
            KeyMaterial::Private { key, .. } => data[1..].copy_from_slice(&key.as_bytes()),
            KeyMaterial::Public(key) => data.copy_from_slice(&key.as_bytes()),
        }
        data
    }
}

#[derive(Clone)]
pub struct ExtendedKey {
    key: KeyMaterial,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_index: u32,
    network: Arc<NetworkProfile>,
    curve: Arc<dyn CurvePointOps>,
}

impl ExtendedKey {
    /**
        Constructs an extended key from raw parts, checking every field.

        `key` is a 32 byte scalar when `is_private` is set and a 33 byte
        compressed point otherwise. Depth must fit in one byte, the parent
        fingerprint must be exactly four bytes, the child index must fit in
        32 bits and the chain code must be 32 bytes.
    */
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        key: &[u8],
        chain_code: &[u8],
        depth: u32,
        parent_fingerprint: &[u8],
        child_index: u64,
        network: Arc<NetworkProfile>,
        curve: Arc<dyn CurvePointOps>,
        is_private: bool,
    ) -> KeyResult<Self> {
        let key = if is_private {
            KeyMaterial::private(PrivKey::from_slice(key, curve.as_ref())?)
        } else {
            KeyMaterial::Public(PubKey::from_slice(key, curve.as_ref())?)
        };

        let fingerprint: [u8; 4] = parent_fingerprint.try_into().map_err(|_| KeyError::InvalidFieldRange {
            field: KeyField::ParentFingerprint,
            detail: format!("expected 4 bytes, found {}", parent_fingerprint.len()),
        })?;

        let child_index: u32 = child_index.try_into().map_err(|_| KeyError::InvalidFieldRange {
            field: KeyField::ChildIndex,
            detail: format!("{} does not fit in 32 bits", child_index),
        })?;

        if chain_code.len() != CHAIN_CODE_LEN {
            return Err(KeyError::InvalidChainCodeLength(chain_code.len()));
        }
        let mut code = [0u8; 32];
        code.copy_from_slice(chain_code);

        Self::assemble(key, code, depth, fingerprint, child_index, network, curve)
    }

    fn assemble(
        key: KeyMaterial,
        chain_code: [u8; 32],
        depth: u32,
        parent_fingerprint: [u8; 4],
        child_index: u32,
        network: Arc<NetworkProfile>,
        curve: Arc<dyn CurvePointOps>,
    ) -> KeyResult<Self> {
        let depth: u8 = depth.try_into().map_err(|_| KeyError::InvalidFieldRange {
            field: KeyField::Depth,
            detail: format!("{} is outside [0, 255]", depth),
        })?;

        Ok(Self {
            key,
            chain_code,
            depth,
            parent_fingerprint,
            child_index,
            network,
            curve,
        })
    }

    /**
        Creates the master key of a seed.
        I = HMAC-SHA512(key = "Bitcoin seed", data = seed); the left half is
        the master private key and the right half the chaincode.
    */
    pub(crate) fn new_master(
        seed: &[u8],
        network: Arc<NetworkProfile>,
        curve: Arc<dyn CurvePointOps>,
    ) -> KeyResult<Self> {
        if seed.len() < MIN_SEED_BYTES || seed.len() > MAX_SEED_BYTES {
            return Err(KeyError::InvalidSeedLength(seed.len()));
        }

        let mut i = hash::hmac_sha512(seed, MASTER_KEY)?;
        let key = PrivKey::from_slice(&i[..PRIVATE_KEY_LEN], curve.as_ref());
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[PRIVATE_KEY_LEN..]);
        i.zeroize();

        debug!("created master key on {}", network.name());
        Self::assemble(KeyMaterial::private(key?), chain_code, 0, [0; 4], 0, network, curve)
    }

    /**
        Decodes a serialized extended key. The version bytes pick the
        network out of `networks`.
    */
    pub fn decode(text: &str, networks: &[NetworkProfile], curve: Arc<dyn CurvePointOps>) -> KeyResult<Self> {
        let mut failure: Option<KeyError> = None;
        let mut unmatched: Option<Vec<u8>> = None;

        for network in networks {
            //Text outside the alphabet is a corrupted key, reported like any other bad checksum
            let bytes = match Base58::decode(network, text) {
                Ok(bytes) => bytes,
                Err(_) => {
                    failure.get_or_insert(KeyError::ChecksumMismatch);
                    continue;
                }
            };
            if bytes.len() != SERIALIZED_LEN {
                failure.get_or_insert(KeyError::MalformedPayloadLength {
                    expected: SERIALIZED_LEN,
                    found: bytes.len(),
                });
                continue;
            }
            if network.match_hd_version(&bytes[..4]).is_some() {
                return Self::from_payload(&bytes, network, curve);
            }
            unmatched.get_or_insert(bytes);
        }

        //No network claims the version: only report it as unknown when the data is intact
        if let Some(bytes) = unmatched {
            debug!("extended key version {} matches no network", hex::encode(&bytes[..4]));
            if KeyHash::ALL.iter().any(|h| validate_checksum(&bytes, *h)) {
                return Err(KeyError::UnknownVersion(bytes[..4].to_vec()));
            }
            return Err(KeyError::ChecksumMismatch);
        }

        Err(failure.unwrap_or_else(|| KeyError::UnknownVersion(Vec::new())))
    }

    fn from_payload(bytes: &[u8], network: &NetworkProfile, curve: Arc<dyn CurvePointOps>) -> KeyResult<Self> {
        if !validate_checksum(bytes, network.key_hash()) {
            return Err(KeyError::ChecksumMismatch);
        }

        let depth = bytes[4] as u32;
        let fingerprint = &bytes[5..9];
        let mut index = [0u8; 4];
        index.copy_from_slice(&bytes[9..13]);
        let chain_code = &bytes[13..KEY_DATA_START];

        //A zero first byte marks a private key
        let is_private = bytes[KEY_DATA_START] == 0x00;
        let key = if is_private {
            &bytes[KEY_DATA_START + 1..PAYLOAD_LEN]
        } else {
            &bytes[KEY_DATA_START..PAYLOAD_LEN]
        };

        debug!(
            "decoded {} extended key on {} at depth {}",
            if is_private { "private" } else { "public" },
            network.name(),
            depth
        );
        Self::from_parts(
            key,
            chain_code,
            depth,
            fingerprint,
            u32::from_be_bytes(index) as u64,
            Arc::new(network.clone()),
            curve,
            is_private,
        )
    }

    /**
        Builds a child of self one level down.
    */
    pub(crate) fn child(&self, key: KeyMaterial, chain_code: [u8; 32], index: u32) -> KeyResult<Self> {
        Self::assemble(
            key,
            chain_code,
            self.depth as u32 + 1,
            self.fingerprint()?,
            index,
            Arc::clone(&self.network),
            Arc::clone(&self.curve),
        )
    }

    pub fn network(&self) -> &NetworkProfile {
        &self.network
    }

    pub(crate) fn curve(&self) -> &Arc<dyn CurvePointOps> {
        &self.curve
    }

    pub fn is_private(&self) -> bool {
        matches!(self.key, KeyMaterial::Private { .. })
    }

    pub fn is_public(&self) -> bool {
        !self.is_private()
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn chain_code(&self) -> [u8; 32] {
        self.chain_code
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    pub fn child_index(&self) -> u32 {
        self.child_index
    }

    pub fn is_hardened(&self) -> bool {
        self.child_index >= HARDENED_KEY_START
    }

    /**
        Return the private key part of self.
        Fails on extended public keys.
    */
    pub fn private_key(&self) -> KeyResult<&PrivKey> {
        match &self.key {
            KeyMaterial::Private { key, .. } => Ok(key),
            KeyMaterial::Public(_) => Err(KeyError::PrivateKeyUnavailable),
        }
    }

    /**
        Return the non extended public key of self.
    */
    pub fn public_key(&self) -> KeyResult<PubKey> {
        match &self.key {
            KeyMaterial::Private { key, public } => public
                .get_or_try_init(|| key.public_key(self.curve.as_ref()))
                .map(|key| *key),
            KeyMaterial::Public(key) => Ok(*key),
        }
    }

    /**
        Identifier of this key: the first four bytes of the hash160 of its
        public key. Children carry it as their parent fingerprint.
    */
    pub fn fingerprint(&self) -> KeyResult<[u8; 4]> {
        let id = self.public_key()?.hash160(self.network.key_hash());
        let mut fingerprint = [0u8; 4];
        fingerprint.copy_from_slice(&id[..4]);
        Ok(fingerprint)
    }

    /// Derives the child at `index`; indexes of 2^31 and above are hardened.
    pub fn private_child_key(&self, index: u32) -> KeyResult<Self> {
        derive_private_child(self, index)
    }

    /// Derives the public child at `index`.
    pub fn public_child_key(&self, index: u32) -> KeyResult<Self> {
        derive_public_child(self, index)
    }

    /**
        Derives the hardened child 2^31 + `index`.
        `index` itself must be below 2^31.
    */
    pub fn hardened_child_key(&self, index: u32) -> KeyResult<Self> {
        let index = ChildOptions::Hardened(index).index()?;
        derive_private_child(self, index)
    }

    /**
        Derives the key for a single path step. Hardened steps need a private
        key; normal steps use private derivation on private keys and public
        derivation on public keys.
    */
    pub fn get_xchild(&self, options: ChildOptions) -> KeyResult<Self> {
        let index = options.index()?;
        if self.is_private() {
            derive_private_child(self, index)
        } else {
            derive_public_child(self, index)
        }
    }

    /**
        Derive the key at the given path, relative to self.
        eg. m/44'/20'/0'/0 walks four levels down.
    */
    pub fn derive_path(&self, path: &Path) -> KeyResult<Self> {
        let mut current = self.clone();
        for step in path.children.iter() {
            current = current.get_xchild(*step)?;
        }
        Ok(current)
    }

    /**
        Returns the extended public key of self. Public keys are returned unchanged.
    */
    pub fn neuter(&self) -> KeyResult<Self> {
        match &self.key {
            KeyMaterial::Public(_) => Ok(self.clone()),
            KeyMaterial::Private { .. } => Ok(Self {
                key: KeyMaterial::Public(self.public_key()?),
                chain_code: self.chain_code,
                depth: self.depth,
                parent_fingerprint: self.parent_fingerprint,
                child_index: self.child_index,
                network: Arc::clone(&self.network),
                curve: Arc::clone(&self.curve),
            }),
        }
    }

    /**
        Pay-to-pubkey-hash address of the public key of self.
    */
    pub fn address(&self) -> KeyResult<String> {
        Address::from_key(self)
    }

    /// m / 44' / coin_type'
    pub fn derive_coin_type_key(&self, coin_type: u32) -> KeyResult<Self> {
        if coin_type > MAX_COIN_TYPE {
            return Err(KeyError::CoinTypeOutOfRange(coin_type));
        }
        self.hardened_child_key(BIP44_PURPOSE)?.hardened_child_key(coin_type)
    }

    /// Hardened account key below a coin type key.
    pub fn derive_account_key(&self, account: u32) -> KeyResult<Self> {
        if account > MAX_ACCOUNT_NUM {
            return Err(KeyError::AccountOutOfRange(account));
        }
        self.hardened_child_key(account)
    }

    pub fn derive_external_branch(&self) -> KeyResult<Self> {
        self.private_child_key(EXTERNAL_BRANCH)
    }

    pub fn derive_internal_branch(&self) -> KeyResult<Self> {
        self.private_child_key(INTERNAL_BRANCH)
    }

    /// The 78 byte payload that is check encoded.
    pub fn payload(&self) -> [u8; PAYLOAD_LEN] {
        let version = if self.is_private() {
            self.network.hd_private_version()
        } else {
            self.network.hd_public_version()
        };

        let mut payload = [0u8; PAYLOAD_LEN];
        payload[..4].copy_from_slice(&version);
        payload[4] = self.depth;
        payload[5..9].copy_from_slice(&self.parent_fingerprint);
        payload[9..13].copy_from_slice(&self.child_index.to_be_bytes());
        payload[13..KEY_DATA_START].copy_from_slice(&self.chain_code);
        payload[KEY_DATA_START..].copy_from_slice(&self.key.key_data());
        payload
    }

    /**
        Serialize the extended key with the version bytes of its network.
    */
    pub fn serialize(&self) -> KeyResult<String> {
        let mut payload = self.payload();
        let encoded = Base58::new(&self.network, &[], &payload).check_encode();
        payload.zeroize();
        encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        curve::Secp256k1Curve,
        hdwallet::{Keychain, DECRED_COIN_TYPE, DEFAULT_ACCOUNT},
        network::NetworkParams,
    };
    use proptest::prelude::*;

    //BIP32 test vectors are defined with Bitcoin version bytes and double SHA-256
    fn bitcoin() -> NetworkProfile {
        NetworkProfile::Custom(
            NetworkParams::new(
                "bitcoin",
                [0x04, 0x88, 0xad, 0xe4],
                [0x04, 0x88, 0xb2, 0x1e],
                &[0x00],
                KeyHash::Sha256,
            )
            .unwrap(),
        )
    }

    fn master(seed: &str, network: &NetworkProfile) -> ExtendedKey {
        Keychain::new().new_master(&hex::decode(seed).unwrap(), network).unwrap()
    }

    fn assert_pair(key: &ExtendedKey, xpub: &str, xprv: &str) {
        assert_eq!(key.neuter().unwrap().serialize().unwrap(), xpub);
        assert_eq!(key.serialize().unwrap(), xprv);
    }

    #[test]
    fn bip32_vector_1() {
        let m = master("000102030405060708090a0b0c0d0e0f", &bitcoin());
        assert_pair(
            &m,
            "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8",
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi",
        );

        let m_0h = m.hardened_child_key(0).unwrap();
        assert_pair(
            &m_0h,
            "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw",
            "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7",
        );

        let m_0h_1 = m_0h.private_child_key(1).unwrap();
        assert_pair(
            &m_0h_1,
            "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikHjJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ",
            "xprv9wTYmMFdV23N2TdNG573QoEsfRrWKQgWeibmLntzniatZvR9BmLnvSxqu53Kw1UmYPxLgboyZQaXwTCg8MSY3H2EU4pWcQDnRnrVA1xe8fs",
        );

        let m_0h_1_2h = m_0h_1.hardened_child_key(2).unwrap();
        assert_pair(
            &m_0h_1_2h,
            "xpub6D4BDPcP2GT577Vvch3R8wDkScZWzQzMMUm3PWbmWvVJrZwQY4VUNgqFJPMM3No2dFDFGTsxxpG5uJh7n7epu4trkrX7x7DogT5Uv6fcLW5",
            "xprv9z4pot5VBttmtdRTWfWQmoH1taj2axGVzFqSb8C9xaxKymcFzXBDptWmT7FwuEzG3ryjH4ktypQSAewRiNMjANTtpgP4mLTj34bhnZX7UiM",
        );

        let m_0h_1_2h_2 = m_0h_1_2h.private_child_key(2).unwrap();
        assert_pair(
            &m_0h_1_2h_2,
            "xpub6FHa3pjLCk84BayeJxFW2SP4XRrFd1JYnxeLeU8EqN3vDfZmbqBqaGJAyiLjTAwm6ZLRQUMv1ZACTj37sR62cfN7fe5JnJ7dh8zL4fiyLHV",
            "xprvA2JDeKCSNNZky6uBCviVfJSKyQ1mDYahRjijr5idH2WwLsEd4Hsb2Tyh8RfQMuPh7f7RtyzTtdrbdqqsunu5Mm3wDvUAKRHSC34sJ7in334",
        );

        let m_0h_1_2h_2_1000000000 = m_0h_1_2h_2.private_child_key(1_000_000_000).unwrap();
        assert_pair(
            &m_0h_1_2h_2_1000000000,
            "xpub6H1LXWLaKsWFhvm6RVpEL9P4KfRZSW7abD2ttkWP3SSQvnyA8FSVqNTEcYFgJS2UaFcxupHiYkro49S8yGasTvXEYBVPamhGW6cFJodrTHy",
            "xprvA41z7zogVVwxVSgdKUHDy1SKmdb533PjDz7J6N6mV6uS3ze1ai8FHa8kmHScGpWmj4WggLyQjgPie1rFSruoUihUZREPSL39UNdE3BBDu76",
        );
    }

    #[test]
    fn bip32_vector_2() {
        let m = master(
            "fffcf9f6f3f0edeae7e4e1dedbd8d5d2cfccc9c6c3c0bdbab7b4b1aeaba8a5a29f9c999693908d8a8784817e7b7875726f6c696663605d5a5754514e4b484542",
            &bitcoin(),
        );
        assert_pair(
            &m,
            "xpub661MyMwAqRbcFW31YEwpkMuc5THy2PSt5bDMsktWQcFF8syAmRUapSCGu8ED9W6oDMSgv6Zz8idoc4a6mr8BDzTJY47LJhkJ8UB7WEGuduB",
            "xprv9s21ZrQH143K31xYSDQpPDxsXRTUcvj2iNHm5NUtrGiGG5e2DtALGdso3pGz6ssrdK4PFmM8NSpSBHNqPqm55Qn3LqFtT2emdEXVYsCzC2U",
        );

        let m_0 = m.private_child_key(0).unwrap();
        assert_pair(
            &m_0,
            "xpub69H7F5d8KSRgmmdJg2KhpAK8SR3DjMwAdkxj3ZuxV27CprR9LgpeyGmXUbC6wb7ERfvrnKZjXoUmmDznezpbZb7ap6r1D3tgFxHmwMkQTPH",
            "xprv9vHkqa6EV4sPZHYqZznhT2NPtPCjKuDKGY38FBWLvgaDx45zo9WQRUT3dKYnjwih2yJD9mkrocEZXo1ex8G81dwSM1fwqWpWkeS3v86pgKt",
        );

        let m_0_2147483647h = m_0.hardened_child_key(2_147_483_647).unwrap();
        assert_pair(
            &m_0_2147483647h,
            "xpub6ASAVgeehLbnwdqV6UKMHVzgqAG8Gr6riv3Fxxpj8ksbH9ebxaEyBLZ85ySDhKiLDBrQSARLq1uNRts8RuJiHjaDMBU4Zn9h8LZNnBC5y4a",
            "xprv9wSp6B7kry3Vj9m1zSnLvN3xH8RdsPP1Mh7fAaR7aRLcQMKTR2vidYEeEg2mUCTAwCd6vnxVrcjfy2kRgVsFawNzmjuHc2YmYRmagcEPdU9",
        );

        let m_0_2147483647h_1 = m_0_2147483647h.private_child_key(1).unwrap();
        assert_pair(
            &m_0_2147483647h_1,
            "xpub6DF8uhdarytz3FWdA8TvFSvvAh8dP3283MY7p2V4SeE2wyWmG5mg5EwVvmdMVCQcoNJxGoWaU9DCWh89LojfZ537wTfunKau47EL2dhHKon",
            "xprv9zFnWC6h2cLgpmSA46vutJzBcfJ8yaJGg8cX1e5StJh45BBciYTRXSd25UEPVuesF9yog62tGAQtHjXajPPdbRCHuWS6T8XA2ECKADdw4Ef",
        );

        let m_0_2147483647h_1_2147483646h = m_0_2147483647h_1.hardened_child_key(2_147_483_646).unwrap();
        assert_pair(
            &m_0_2147483647h_1_2147483646h,
            "xpub6ERApfZwUNrhLCkDtcHTcxd75RbzS1ed54G1LkBUHQVHQKqhMkhgbmJbZRkrgZw4koxb5JaHWkY4ALHY2grBGRjaDMzQLcgJvLJuZZvRcEL",
            "xprvA1RpRA33e1JQ7ifknakTFpgNXPmW2YvmhqLQYMmrj4xJXXWYpDPS3xz7iAxn8L39njGVyuoseXzU6rcxFLJ8HFsTjSyQbLYnMpCqE2VbFWc",
        );

        let leaf = m_0_2147483647h_1_2147483646h.private_child_key(2).unwrap();
        assert_pair(
            &leaf,
            "xpub6FnCn6nSzZAw5Tw7cgR9bi15UV96gLZhjDstkXXxvCLsUXBGXPdSnLFbdpq8p9HmGsApME5hQTZ3emM2rnY5agb9rXpVGyy3bdW6EEgAtqt",
            "xprvA2nrNbFZABcdryreWet9Ea4LvTJcGsqrMzxHx98MMrotbir7yrKCEXw7nadnHM8Dq38EGfSh6dqA9QWTyefMLEcBYJUuekgW4BYPJcr9E7j",
        );
    }

    #[test]
    fn bip32_vector_3() {
        //Retention of leading zeros in the private key
        let m = master(
            "4b381541583be4423346c643850da4b320e46a87ae3d2a4e6da11eba819cd4acba45d239319ac14f863b8d5ab5a0d0c64d2e8a1e7d1457df2e5a3c51c73235be",
            &bitcoin(),
        );
        assert_pair(
            &m,
            "xpub661MyMwAqRbcEZVB4dScxMAdx6d4nFc9nvyvH3v4gJL378CSRZiYmhRoP7mBy6gSPSCYk6SzXPTf3ND1cZAceL7SfJ1Z3GC8vBgp2epUt13",
            "xprv9s21ZrQH143K25QhxbucbDDuQ4naNntJRi4KUfWT7xo4EKsHt2QJDu7KXp1A3u7Bi1j8ph3EGsZ9Xvz9dGuVrtHHs7pXeTzjuxBrCmmhgC6",
        );

        let m_0h = m.hardened_child_key(0).unwrap();
        assert_pair(
            &m_0h,
            "xpub68NZiKmJWnxxS6aaHmn81bvJeTESw724CRDs6HbuccFQN9Ku14VQrADWgqbhhTHBaohPX4CjNLf9fq9MYo6oDaPPLPxSb7gwQN3ih19Zm4Y",
            "xprv9uPDJpEQgRQfDcW7BkF7eTya6RPxXeJCqCJGHuCJ4GiRVLzkTXBAJMu2qaMWPrS7AANYqdq6vcBcBUdJCVVFceUvJFjaPdGZ2y9WACViL4L",
        );
    }

    #[test]
    fn decred_account_layout() {
        let m = master("110131b162cfba8077facb546955d0e45dca7c93c1a27379a4cf166b882508c0", &NetworkProfile::MainNet);
        assert_eq!(
            m.serialize().unwrap(),
            "dprv3hCznBesA6jBufbh3Y9f5cmEa3rmeNMnr7tzTiEVbYrXmTXgnD9ZrqUPzANojB19ntJqCydHVgcwVne72cd5TJPrr5CnmVxUaUbkA3BcByq"
        );

        let purpose = m.hardened_child_key(44).unwrap();
        assert_eq!(
            purpose.serialize().unwrap(),
            "dprv3kvp7kdbp529Dm7YB4Usb3nq4z85ac3a75qa6d3Wjhr1Yxtyt3YjbvpSbZJY5e8AVooC6VKDTpAjkPaTifxc7ZtLU78smZE7qZYQKEqCnCh"
        );

        let coin_type = purpose.hardened_child_key(DECRED_COIN_TYPE).unwrap();
        assert_eq!(
            coin_type.serialize().unwrap(),
            "dprv3nar8Jwt7u8Tfh6Q5hZrz1etQyug1p464iKJA4f3pBKWpstdDAn4gttgLW5KFn6hEYvqNH6BJMRgh6ybyYHUbFC98U63RyMhPfrmHfa3K25"
        );
        assert_eq!(m.derive_coin_type_key(DECRED_COIN_TYPE).unwrap(), coin_type);

        let account = coin_type.hardened_child_key(20).unwrap();
        assert_eq!(
            account.serialize().unwrap(),
            "dprv3oH7V64hFGP5UeYm5eTyDtzz2QyZqEHFkh8HLfjq62T2FyVvzdEhQMhg6iijuduJDndBVscHtURUMwBPrDQ4ckQ6PXgGJBHteRv6k3Nnw9W"
        );

        let external = account.private_child_key(0).unwrap();
        assert_eq!(
            external.serialize().unwrap(),
            "dprv3qL8MJLw4yuPBSHWXHvgxgcC9SjEtKcLJgEpZr1k3AyGhHymTWHs5LPvEjJk3yXjt2GkufkQZ6NHurjuJ6S1aHLqx8XxxeRsXqDuEnHJQ64"
        );
        assert_eq!(account.derive_external_branch().unwrap(), external);

        let dpub = "dpubZH8DiRuE9MyB5rBGmoz3UuQSmTHWKGCQWDs9Jkx73FZuQr1QLTdU9uuwPRbEgEnMYriY9SUr4XshamuoXZC121HVqPXBSFvE57gG9pZd2Ts";
        assert_eq!(account.public_child_key(0).unwrap().serialize().unwrap(), dpub);
        assert_eq!(external.neuter().unwrap().serialize().unwrap(), dpub);
    }

    #[test]
    fn default_wallet_layout() {
        let keychain = Keychain::new();
        let m = keychain
            .from_string("dprv3hCznBesA6jBushjx7y9NrfheE4ZshnaKYtsoLXefmLPzrXgEiXkdRMD6UngnmBYZzgNhdEd4K3PidxcaCiR6HC9hmpj8FcrP4Cv7zBwELA")
            .unwrap();
        assert_eq!(*m.network(), NetworkProfile::MainNet);

        let account = m.hardened_child_key(0).unwrap();
        let external = account.private_child_key(0).unwrap();
        let internal = account.private_child_key(1).unwrap();

        assert_eq!(external.private_child_key(10).unwrap().address().unwrap(), "DshMmJ3bfvMDdk1mkXRD3x5xDuPwSxoYGfi");
        assert_eq!(internal.private_child_key(0).unwrap().address().unwrap(), "DsoTyktAyEDkYpgKSex6zx5rrkFDi2gAsHr");

        //Public derivation reaches the same addresses
        let account_public = account.neuter().unwrap();
        let leaf = account_public.public_child_key(0).unwrap().public_child_key(10).unwrap();
        assert_eq!(leaf.address().unwrap(), "DshMmJ3bfvMDdk1mkXRD3x5xDuPwSxoYGfi");

        assert_eq!(
            m.neuter().unwrap().serialize().unwrap(),
            "dpubZ9169KDAEUnypHbWCe2Vu5TxGEcqJeNeX6XCYFU1fqw2iQZK7fsMhzsEFArbLmyUdprUw9aXHneUNd92bjc31TqC6sUduMY6PK2z4JXDS8j"
        );
    }

    #[test]
    fn testnet_master() {
        let m = master("000102030405060708090a0b0c0d0e0f", &NetworkProfile::TestNet);
        assert_eq!(
            m.serialize().unwrap(),
            "tprvZUo1ZuEfLLFWfAYiMVaoDV1EeLmbSRuNzaSh7F4awft7dm8nHfFAFZyobWQyV8Qr26r8M2CmNw6nEb35HaECWFGy1vzx2ZGdyfBeaaHudoi"
        );
        assert_eq!(
            m.neuter().unwrap().serialize().unwrap(),
            "tpubVhnMyQmZAhoosedBTX7oacwyCNc5qtdEMoNHudUCW1R6WZTvqCZQoNJHSn4H11puwdk4qyDv2ET637EDap4r8HH3odjBC5nEjmnPcsDfLwm"
        );
        assert_eq!(m.address().unwrap(), "TsiBhMy6LYKGkHeWbPYEPFMu9VgqwRgkt8T");
    }

    #[test]
    fn string_round_trip() {
        let keychain = Keychain::new();
        let m = master("000102030405060708090a0b0c0d0e0f", &NetworkProfile::MainNet);
        let child = m.hardened_child_key(3).unwrap().private_child_key(7).unwrap();

        for key in [m.clone(), m.neuter().unwrap(), child.clone(), child.neuter().unwrap()] {
            let text = key.serialize().unwrap();
            let decoded = keychain.from_string(&text).unwrap();
            assert_eq!(decoded, key);
            assert_eq!(decoded.serialize().unwrap(), text);
            assert_eq!(decoded.is_private(), key.is_private());
        }

        let xprv = master("000102030405060708090a0b0c0d0e0f", &bitcoin()).serialize().unwrap();
        let decoded = keychain.from_string_in(&xprv, &[bitcoin()]).unwrap();
        assert_eq!(decoded.network().name(), "bitcoin");
    }

    #[test]
    fn master_seed_length() {
        let keychain = Keychain::new();
        assert_eq!(
            keychain.new_master(b"22", &NetworkProfile::MainNet).unwrap_err(),
            KeyError::InvalidSeedLength(2)
        );
        assert_eq!(
            keychain.new_master(&[7u8; 65], &NetworkProfile::MainNet).unwrap_err(),
            KeyError::InvalidSeedLength(65)
        );
        assert!(keychain.new_master(&[7u8; 16], &NetworkProfile::MainNet).is_ok());
        assert!(keychain.new_master(&[7u8; 64], &NetworkProfile::MainNet).is_ok());
    }

    #[test]
    fn neuter_is_idempotent() {
        let m = master("000102030405060708090a0b0c0d0e0f", &NetworkProfile::MainNet);
        let public = m.neuter().unwrap();
        assert!(public.is_public());
        assert_eq!(public.neuter().unwrap(), public);
        assert_eq!(public.public_key().unwrap(), m.public_key().unwrap());
        assert_eq!(public.private_key().unwrap_err(), KeyError::PrivateKeyUnavailable);
    }

    #[test]
    fn bip44_guards() {
        let m = master("000102030405060708090a0b0c0d0e0f", &bitcoin());
        assert_eq!(
            m.derive_coin_type_key(MAX_COIN_TYPE + 1).unwrap_err(),
            KeyError::CoinTypeOutOfRange(MAX_COIN_TYPE + 1)
        );
        assert!(m.derive_coin_type_key(MAX_COIN_TYPE).is_ok());

        let coin = m.derive_coin_type_key(DECRED_COIN_TYPE).unwrap();
        assert_eq!(
            coin.derive_account_key(MAX_ACCOUNT_NUM + 1).unwrap_err(),
            KeyError::AccountOutOfRange(MAX_ACCOUNT_NUM + 1)
        );
        let account = coin.derive_account_key(DEFAULT_ACCOUNT).unwrap();
        assert_eq!(account.depth(), 3);
        assert_eq!(account.child_index(), HARDENED_KEY_START);

        assert_eq!(
            m.hardened_child_key(HARDENED_KEY_START).unwrap_err(),
            KeyError::InvalidFieldRange {
                field: KeyField::ChildIndex,
                detail: format!("expected an index below 2^31, found {}", HARDENED_KEY_START),
            }
        );
    }

    #[test]
    fn hardened_public_child_of_private_parent() {
        let m = master("000102030405060708090a0b0c0d0e0f", &bitcoin());
        let public_child = m.public_child_key(HARDENED_KEY_START).unwrap();
        assert!(public_child.is_public());
        assert!(public_child.is_hardened());
        assert_ne!(public_child, m.hardened_child_key(0).unwrap().neuter().unwrap());

        assert_eq!(
            m.neuter().unwrap().public_child_key(HARDENED_KEY_START + 1).unwrap_err(),
            KeyError::HardenedFromPublicKey
        );
    }

    #[test]
    fn field_range_rejection() {
        let m = master("000102030405060708090a0b0c0d0e0f", &bitcoin());
        let key = m.private_key().unwrap().as_bytes();
        let curve: Arc<dyn CurvePointOps> = Arc::new(Secp256k1Curve::new());
        let network = Arc::new(bitcoin());
        let build = |depth: u32, fingerprint: &[u8], index: u64, chain_code: &[u8]| {
            ExtendedKey::from_parts(&key, chain_code, depth, fingerprint, index, network.clone(), curve.clone(), true)
        };
        let chain_code = m.chain_code();

        assert!(build(255, &[0; 4], 0, &chain_code).is_ok());
        assert!(matches!(
            build(256, &[0; 4], 0, &chain_code),
            Err(KeyError::InvalidFieldRange { field: KeyField::Depth, .. })
        ));
        assert!(matches!(
            build(0, &[0; 4], 2 * HARDENED_KEY_START as u64 + 20, &chain_code),
            Err(KeyError::InvalidFieldRange { field: KeyField::ChildIndex, .. })
        ));
        assert!(matches!(
            build(0, b"-2000", 0, &chain_code),
            Err(KeyError::InvalidFieldRange { field: KeyField::ParentFingerprint, .. })
        ));

        let mut long_chain_code = chain_code.to_vec();
        long_chain_code.extend_from_slice(b"fasdfasd");
        assert!(matches!(
            build(0, &[0; 4], 0, &long_chain_code),
            Err(KeyError::InvalidChainCodeLength(40))
        ));

        assert_eq!(
            ExtendedKey::from_parts(&[0u8; 32], &chain_code, 0, &[0; 4], 0, network.clone(), curve.clone(), true)
                .unwrap_err(),
            KeyError::UnusableScalar
        );
        let mut off_curve = [0u8; 33];
        off_curve[0] = 0x02;
        off_curve[32] = 0x05;
        assert_eq!(
            ExtendedKey::from_parts(&off_curve, &chain_code, 0, &[0; 4], 0, network, curve, false).unwrap_err(),
            KeyError::PointNotOnCurve
        );
    }

    #[test]
    fn maximum_depth_has_no_children() {
        let m = master("000102030405060708090a0b0c0d0e0f", &NetworkProfile::MainNet);
        let deep = ExtendedKey::from_parts(
            &m.private_key().unwrap().as_bytes(),
            &m.chain_code(),
            255,
            &[1, 2, 3, 4],
            9,
            Arc::new(NetworkProfile::MainNet),
            Arc::new(Secp256k1Curve::new()),
            true,
        )
        .unwrap();
        assert!(matches!(
            deep.private_child_key(0),
            Err(KeyError::InvalidFieldRange { field: KeyField::Depth, .. })
        ));
    }

    #[test]
    fn single_character_changes_are_rejected() {
        let keychain = Keychain::new();
        let text = "dprv3hCznBesA6jBushjx7y9NrfheE4ZshnaKYtsoLXefmLPzrXgEiXkdRMD6UngnmBYZzgNhdEd4K3PidxcaCiR6HC9hmpj8FcrP4Cv7zBwELA";
        let alphabet = crate::network::BASE58_ALPHABET;

        for position in 0..text.len() {
            let current = alphabet.iter().position(|c| *c == text.as_bytes()[position]).unwrap();

            //Next character of the alphabet, then the characters the alphabet leaves out
            for replacement in [alphabet[(current + 1) % 58], b'0', b'O', b'I', b'l'] {
                let mut bytes = text.as_bytes().to_vec();
                bytes[position] = replacement;
                let altered = String::from_utf8(bytes).unwrap();

                match keychain.from_string(&altered) {
                    Err(KeyError::ChecksumMismatch) | Err(KeyError::MalformedPayloadLength { .. }) => {}
                    other => panic!("{} at position {} decoded to {:?}", replacement as char, position, other),
                }
            }
        }
    }

    #[test]
    fn decode_errors() {
        let keychain = Keychain::new();
        assert_eq!(keychain.from_string("dprv0OIl").unwrap_err(), KeyError::ChecksumMismatch);
        assert_eq!(
            keychain.from_string("2g").unwrap_err(),
            KeyError::MalformedPayloadLength { expected: SERIALIZED_LEN, found: 1 }
        );

        //Intact Bitcoin key with no matching network
        let xprv = master("000102030405060708090a0b0c0d0e0f", &bitcoin()).serialize().unwrap();
        assert_eq!(
            keychain.from_string(&xprv).unwrap_err(),
            KeyError::UnknownVersion(vec![0x04, 0x88, 0xad, 0xe4])
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn public_and_private_derivation_agree(
            seed in proptest::collection::vec(any::<u8>(), 16..=64),
            index in 0u32..HARDENED_KEY_START,
        ) {
            let keychain = Keychain::new();
            let m = keychain.new_master(&seed, &NetworkProfile::MainNet);
            prop_assume!(m.is_ok());
            let m = m.unwrap();

            let private_child = m.private_child_key(index);
            prop_assume!(private_child.is_ok());
            let public_child = m.neuter().unwrap().public_child_key(index).unwrap();

            prop_assert_eq!(private_child.unwrap().neuter().unwrap(), public_child);
            prop_assert_eq!(m.neuter().unwrap().public_key().unwrap(), m.public_key().unwrap());
        }
    }
}
