/*
    Entry point for creating extended keys.

    A keychain owns the curve implementation and hands a shared reference
    to every key it creates, so keys derived from each other always
    agree on the curve.
*/

use crate::{
    curve::{CurvePointOps, Secp256k1Curve},
    entropy,
    error::{KeyError, KeyResult},
    hdwallet::{
        ExtendedKey,
        DECRED_COIN_TYPE,
        DEFAULT_ACCOUNT,
        MAX_SEED_ATTEMPTS,
        MAX_SEED_BYTES,
        MIN_SEED_BYTES,
    },
    network::NetworkProfile,
};
use log::{debug, warn};
use once_cell::sync::Lazy;
use rand::{rngs::OsRng, CryptoRng, RngCore};
use std::{fmt, sync::Arc};

//Built on first use and shared by every default keychain; never mutated
static SECP256K1: Lazy<Arc<dyn CurvePointOps>> = Lazy::new(|| Arc::new(Secp256k1Curve::new()));

#[derive(Clone)]
pub struct Keychain {
    curve: Arc<dyn CurvePointOps>,
}

impl Keychain {
    /// Keychain over secp256k1. All keychains made this way share one curve context.
    pub fn new() -> Self {
        Self::with_curve(Arc::clone(&SECP256K1))
    }

    pub fn with_curve(curve: Arc<dyn CurvePointOps>) -> Self {
        Self { curve }
    }

    /**
        Creates the master extended private key of `seed` on `network`.
        The seed must be between 16 and 64 bytes.
    */
    pub fn new_master(&self, seed: &[u8], network: &NetworkProfile) -> KeyResult<ExtendedKey> {
        ExtendedKey::new_master(seed, Arc::new(network.clone()), Arc::clone(&self.curve))
    }

    /**
        Generates a random seed of `length` bytes from the operating system,
        redrawing until the seed yields a usable default account.
    */
    pub fn generate_seed(&self, network: &NetworkProfile, length: usize) -> KeyResult<Vec<u8>> {
        self.generate_seed_with(&mut OsRng, network, length)
    }

    /// Same as `generate_seed`, drawing from `rng`.
    pub fn generate_seed_with<R>(&self, rng: &mut R, network: &NetworkProfile, length: usize) -> KeyResult<Vec<u8>>
    where
        R: RngCore + CryptoRng,
    {
        if length < MIN_SEED_BYTES || length > MAX_SEED_BYTES {
            return Err(KeyError::InvalidSeedLength(length));
        }

        for attempt in 1..=MAX_SEED_ATTEMPTS {
            let seed = entropy::random_bytes_with(rng, length)?;
            match self.verify_seed(&seed, network) {
                Ok(()) => {
                    debug!("generated {} byte seed on {} after {} draw(s)", length, network.name(), attempt);
                    return Ok(seed);
                }
                Err(KeyError::UnusableScalar) => {
                    warn!("seed draw {} gave an unusable key, drawing again", attempt);
                }
                Err(e) => return Err(e),
            }
        }

        Err(KeyError::SeedGenerationExhausted(MAX_SEED_ATTEMPTS))
    }

    /**
        Walks the default account of `seed` down to its first external
        address. Fails with the first error met along the way.
    */
    pub fn verify_seed(&self, seed: &[u8], network: &NetworkProfile) -> KeyResult<()> {
        let account = self
            .new_master(seed, network)?
            .derive_coin_type_key(DECRED_COIN_TYPE)?
            .derive_account_key(DEFAULT_ACCOUNT)?;

        account.neuter()?;
        account.derive_internal_branch()?;
        account.derive_external_branch()?.private_child_key(0)?.address()?;
        Ok(())
    }

    /// Decodes an extended key of one of the built-in networks.
    pub fn from_string(&self, text: &str) -> KeyResult<ExtendedKey> {
        self.from_string_in(text, &NetworkProfile::builtin())
    }

    /// Decodes an extended key whose version bytes belong to one of `networks`.
    pub fn from_string_in(&self, text: &str, networks: &[NetworkProfile]) -> KeyResult<ExtendedKey> {
        ExtendedKey::decode(text, networks, Arc::clone(&self.curve))
    }
}

impl Default for Keychain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Keychain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Keychain").field("curve", &self.curve.name()).finish()
    }
}
