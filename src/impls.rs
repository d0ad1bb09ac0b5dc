/**
    This module combines all the boilerplate
    implementations of fmt::Display and more.
*/

use crate::{
    error::KeyError,
    hdwallet::{ChildOptions, ExtendedKey, Keychain},
    key,
    network::NetworkProfile,
};
use std::{fmt, str::FromStr};

/*
    key module impls
*/
impl fmt::Debug for key::PrivKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PrivKey(<redacted>)")
    }
}

impl fmt::Display for key::PubKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

impl fmt::Debug for key::PubKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PubKey({})", self.as_hex())
    }
}

/*
    network module impls
*/
impl fmt::Display for NetworkProfile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/*
    hdwallet module impls
*/
impl fmt::Display for ChildOptions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChildOptions::Normal(x) => write!(f, "{}", x),
            ChildOptions::Hardened(x) => write!(f, "{}'", x),
        }
    }
}

impl fmt::Display for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let encoded = self.serialize().map_err(|_| fmt::Error)?;
        write!(f, "{}", encoded)
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut debug = f.debug_struct("ExtendedKey");
        debug
            .field("network", &self.network().name())
            .field("private", &self.is_private())
            .field("depth", &self.depth())
            .field("parent_fingerprint", &hex::encode(self.parent_fingerprint()))
            .field("child_index", &self.child_index());
        match self.public_key() {
            Ok(key) => debug.field("public_key", &key),
            Err(e) => debug.field("public_key", &e),
        };
        debug.finish()
    }
}

/// Two extended keys are equal when they serialize to the same payload on the same network.
impl PartialEq for ExtendedKey {
    fn eq(&self, other: &Self) -> bool {
        self.network() == other.network() && self.payload() == other.payload()
    }
}

impl Eq for ExtendedKey {}

/// Parses an extended key of one of the built-in networks, on the shared secp256k1 curve.
impl FromStr for ExtendedKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Keychain::new().from_string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Secp256k1Curve;

    #[test]
    fn private_keys_are_not_printed() {
        let key = key::PrivKey::from_slice(&[0x11; 32], &Secp256k1Curve::new()).unwrap();
        let printed = format!("{:?}", key);
        assert!(!printed.contains("11"));
        assert!(!printed.contains("17"));
    }

    #[test]
    fn extended_key_text() {
        let text = "dprv3hCznBesA6jBushjx7y9NrfheE4ZshnaKYtsoLXefmLPzrXgEiXkdRMD6UngnmBYZzgNhdEd4K3PidxcaCiR6HC9hmpj8FcrP4Cv7zBwELA";
        let key: ExtendedKey = text.parse().unwrap();
        assert_eq!(key.to_string(), text);

        let debug = format!("{:?}", key);
        assert!(debug.contains("mainnet"));
        assert!(!debug.contains(&hex::encode(key.private_key().unwrap().as_bytes())));

        assert_eq!(NetworkProfile::TestNet.to_string(), "testnet");
    }
}
