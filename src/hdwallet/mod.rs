/*
    This module implements hierarchical deterministic keys
    under the BIP 32 standard, with the BIP 44 account layout
    used by Decred wallets.

    References:
        https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki
        https://github.com/bitcoin/bips/blob/master/bip-0044.mediawiki
*/

pub mod ckd;
pub mod extended_keys;
pub mod keychain;
pub mod path;

pub use ckd::ChildOptions;
pub use extended_keys::ExtendedKey;
pub use keychain::Keychain;
pub use path::Path;

/// HMAC key used to turn a seed into the master key.
pub const MASTER_KEY: &[u8] = b"Bitcoin seed";

pub const RECOMMENDED_SEED_BYTES: usize = 32;
pub const MIN_SEED_BYTES: usize = 16;
pub const MAX_SEED_BYTES: usize = 64;

/// Indexes at or above this value derive hardened children.
pub const HARDENED_KEY_START: u32 = 0x8000_0000;

pub const BIP44_PURPOSE: u32 = 44;
pub const DECRED_COIN_TYPE: u32 = 20;
pub const MAX_COIN_TYPE: u32 = HARDENED_KEY_START - 2;
pub const DEFAULT_ACCOUNT: u32 = 0;
pub const MAX_ACCOUNT_NUM: u32 = HARDENED_KEY_START - 2;
pub const EXTERNAL_BRANCH: u32 = 0;
pub const INTERNAL_BRANCH: u32 = 1;

/// Number of random draws `Keychain::generate_seed` makes before giving up.
pub const MAX_SEED_ATTEMPTS: usize = 64;
