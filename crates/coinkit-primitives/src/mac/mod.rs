//! Keyed hashing (HMAC, RFC 2104) over SHA-256 and SHA-512.
//!
//! Keys longer than the digest block size are hashed first, shorter keys are
//! zero-padded; both are handled by the `hmac` crate exactly as the RFC
//! prescribes, so tags interoperate bit-for-bit with other implementations.

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

/// Output length of [`hmac_sha256`].
pub const HMAC_SHA256_LEN: usize = 32;

/// Output length of [`hmac_sha512`].
pub const HMAC_SHA512_LEN: usize = 64;

pub(crate) type HmacSha256 = Hmac<Sha256>;
pub(crate) type HmacSha512 = Hmac<Sha512>;

/// Compute HMAC-SHA256 of `data` under `key`.
///
/// # Arguments
/// * `key` - The HMAC key bytes (any length).
/// * `data` - The message bytes to authenticate.
///
/// # Returns
/// A 32-byte tag.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; HMAC_SHA256_LEN] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Compute HMAC-SHA512 of `data` under `key`.
///
/// # Arguments
/// * `key` - The HMAC key bytes (any length).
/// * `data` - The message bytes to authenticate.
///
/// # Returns
/// A 64-byte tag.
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; HMAC_SHA512_LEN] {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    let mut output = [0u8; HMAC_SHA512_LEN];
    output.copy_from_slice(&mac.finalize().into_bytes());
    output
}
