//! Coinkit - Cryptographic primitives for Bitcoin wallets.
//!
//! This crate provides the low-level building blocks wallet code is built on:
//! - Hash functions (SHA-256, SHA-256d, SHA-512, RIPEMD-160, Hash160)
//! - HMAC-SHA256 and HMAC-SHA512
//! - Key derivation (PBKDF2-HMAC-SHA256/512, scrypt)
//! - AES-128/192/256 in ECB mode and CBC mode with PKCS#7 padding
//! - secp256k1 keys, ECDSA and Schnorr signatures, DER encoding, low-S normalization
//! - Variable-length integer encoding
//!
//! Every operation is a synchronous, stateless transformation of input bytes to
//! output bytes. Buffers holding secrets are wiped before the call returns.

pub mod hash;
pub mod mac;
pub mod kdf;
pub mod aes;
pub mod ec;
pub mod util;

mod error;
pub use error::{ErrorKind, PrimitivesError};

pub use hash::{HASH160_LEN, SHA256_LEN, SHA512_LEN};
pub use mac::{HMAC_SHA256_LEN, HMAC_SHA512_LEN};
pub use kdf::{PBKDF2_HMAC_SHA256_LEN, PBKDF2_HMAC_SHA512_LEN};
pub use crate::aes::{
    AES_BLOCK_LEN, AES_FLAG_DECRYPT, AES_FLAG_ENCRYPT, AES_KEY_LEN_128, AES_KEY_LEN_192,
    AES_KEY_LEN_256,
};
pub use ec::{
    EC_FLAG_ECDSA, EC_FLAG_SCHNORR, EC_MESSAGE_HASH_LEN, EC_PRIVATE_KEY_LEN, EC_PUBLIC_KEY_LEN,
    EC_PUBLIC_KEY_UNCOMPRESSED_LEN, EC_SIGNATURE_DER_MAX_LEN, EC_SIGNATURE_LEN,
};
