/*
    Module that bundles together the text encodings used for keys and addresses
*/

pub mod base58;

pub use base58::Base58;
