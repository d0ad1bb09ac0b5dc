/*
    Errors returned by every fallible operation in the library.
*/

use std::fmt;
use thiserror::Error;

pub type KeyResult<T> = std::result::Result<T, KeyError>;

/// Positional fields of an extended key that are range checked on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyField {
    Depth,
    ParentFingerprint,
    ChildIndex,
}

impl fmt::Display for KeyField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            KeyField::Depth => "depth",
            KeyField::ParentFingerprint => "parent fingerprint",
            KeyField::ChildIndex => "child index",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid seed length {0}: must be between 16 and 64 bytes (32 recommended)")]
    InvalidSeedLength(usize),

    #[error("the extended key at this index is invalid")]
    UnusableScalar,

    #[error("invalid key: point is not on the curve")]
    PointNotOnCurve,

    #[error("invalid {field} for extended key: {detail}")]
    InvalidFieldRange { field: KeyField, detail: String },

    #[error("chain code should be 32 bytes, found {0}")]
    InvalidChainCodeLength(usize),

    #[error("invalid key material length {0}")]
    InvalidKeyLength(usize),

    #[error("wrong checksum on base58check payload")]
    ChecksumMismatch,

    #[error("wrong payload length: expected {expected} bytes, found {found}")]
    MalformedPayloadLength { expected: usize, found: usize },

    #[error("cannot derive a hardened key from a public key")]
    HardenedFromPublicKey,

    #[error("cannot derive an extended private key from an extended public key")]
    PrivateKeyUnavailable,

    #[error("invalid coin type {0}")]
    CoinTypeOutOfRange(u32),

    #[error("invalid account number {0}")]
    AccountOutOfRange(u32),

    #[error("unknown version bytes {}", hex::encode(.0))]
    UnknownVersion(Vec<u8>),

    #[error("unknown network '{0}'")]
    UnknownNetwork(String),

    #[error("invalid base58 string: {0}")]
    InvalidBase58(String),

    #[error("invalid base58 alphabet: {0}")]
    InvalidAlphabet(String),

    #[error("invalid derivation path '{0}'")]
    BadPath(String),

    #[error("no usable seed after {0} attempts")]
    SeedGenerationExhausted(usize),

    #[error("random source failed: {0}")]
    Entropy(String),
}

impl From<bs58::decode::Error> for KeyError {
    fn from(e: bs58::decode::Error) -> Self {
        KeyError::InvalidBase58(e.to_string())
    }
}
