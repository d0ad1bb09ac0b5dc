/*
    This module contains the default imports for the library.

    Import the library using:
        use dcr_keyaddress::prelude::*;
    to quickly import the essential parts of the library.
*/

pub use crate::{
    address::Address,

    blake::BlakeState,

    curve::{CurvePointOps, Secp256k1Curve},

    error::{KeyError, KeyField, KeyResult},

    hdwallet::{
        ChildOptions,
        ExtendedKey,
        Keychain,
        Path,
        DECRED_COIN_TYPE,
        DEFAULT_ACCOUNT,
        HARDENED_KEY_START,
        RECOMMENDED_SEED_BYTES,
    },

    key::{PrivKey, PubKey},

    network::{KeyHash, NetworkParams, NetworkProfile},
};
