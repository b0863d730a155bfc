//! Message digests used across Bitcoin wallet code.
//!
//! SHA-256, double SHA-256, SHA-512, RIPEMD-160 and Hash160. Every function
//! accepts input of any length and returns a fixed-size array, so the output
//! buffer can never be the wrong size.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

/// Output length of [`sha256`] and [`sha256d`].
pub const SHA256_LEN: usize = 32;

/// Output length of [`sha512`].
pub const SHA512_LEN: usize = 64;

/// Output length of [`hash160`] and [`ripemd160`].
pub const HASH160_LEN: usize = 20;

/// Compute SHA-256 of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte digest.
pub fn sha256(data: &[u8]) -> [u8; SHA256_LEN] {
    Sha256::digest(data).into()
}

/// Compute double SHA-256: SHA-256(SHA-256(data)).
///
/// This is the digest Bitcoin uses for transaction ids, block hashes and
/// signed messages.
pub fn sha256d(data: &[u8]) -> [u8; SHA256_LEN] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// Compute SHA-512 of the input data.
pub fn sha512(data: &[u8]) -> [u8; SHA512_LEN] {
    let mut output = [0u8; SHA512_LEN];
    output.copy_from_slice(&Sha512::digest(data));
    output
}

/// Compute RIPEMD-160 of the input data.
pub fn ripemd160(data: &[u8]) -> [u8; HASH160_LEN] {
    Ripemd160::digest(data).into()
}

/// Compute Hash160: RIPEMD-160(SHA-256(data)).
///
/// Used to shorten public keys and scripts into address payloads.
pub fn hash160(data: &[u8]) -> [u8; HASH160_LEN] {
    Ripemd160::digest(Sha256::digest(data)).into()
}
