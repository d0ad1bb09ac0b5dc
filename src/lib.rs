/*
    Library to create hierarchical deterministic keys and addresses
    for Decred.

    Keys follow BIP32 with the BIP44 account layout. Decred hashes
    public keys and Base58Check payloads with BLAKE-256 instead of
    SHA-256, so the library carries its own BLAKE-256 and lets every
    network choose the hash it uses.

    References:
        - BIP32 (https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki)
            extended keys and child key deriveration

        - BIP44 (https://github.com/bitcoin/bips/blob/master/bip-0044.mediawiki)
            purpose / coin type / account / branch layout

        - The BLAKE SHA-3 proposal (https://www.aumasson.jp/blake/)
            for the hash function and its test vectors
*/

//Outward facing modules
pub mod address;
pub mod blake;
pub mod curve;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod hdwallet;
pub mod key;
pub mod network;
pub mod prelude;
pub mod scalar;

//Modules for internal use
mod entropy;
mod impls;
