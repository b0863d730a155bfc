//! secp256k1 private key.
//!
//! Wraps a k256 signing key, validates the scalar range on construction and
//! signs 32-byte hashes with either ECDSA or BIP-340 Schnorr.

use k256::ecdsa::SigningKey;
use k256::schnorr;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::ec::public_key::PublicKey;
use crate::ec::signature::CompactSignature;
use crate::ec::{SignatureAlgorithm, EC_MESSAGE_HASH_LEN, EC_PRIVATE_KEY_LEN, EC_SIGNATURE_LEN};
use crate::PrimitivesError;

/// BIP-340 auxiliary randomness. Fixed to zero so Schnorr signing is
/// deterministic.
const SCHNORR_AUX_RAND: [u8; 32] = [0u8; 32];

/// A secp256k1 private key.
///
/// Holds a scalar in `[1, n-1]`. The scalar is wiped when the key is dropped:
/// `SigningKey` implements `ZeroizeOnDrop`.
#[derive(Clone)]
pub struct PrivateKey {
    /// The underlying k256 signing key.
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a new random private key using the OS random number generator.
    pub fn random() -> Self {
        PrivateKey {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Create a private key from a 32-byte big-endian scalar.
    ///
    /// # Arguments
    /// * `bytes` - The private key scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the scalar lies in `[1, n-1]`, or an error for a
    /// wrong length, zero, or a value at or above the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != EC_PRIVATE_KEY_LEN {
            return Err(PrimitivesError::length(
                "private key",
                EC_PRIVATE_KEY_LEN,
                bytes.len(),
            ));
        }
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| {
            PrimitivesError::InvalidPrivateKey("scalar is zero or not below the curve order".to_string())
        })?;
        Ok(PrivateKey { inner: signing_key })
    }

    /// Serialize the private key as a 32-byte big-endian array.
    ///
    /// The caller owns the returned copy of the secret.
    pub fn to_bytes(&self) -> [u8; EC_PRIVATE_KEY_LEN] {
        let mut out = [0u8; EC_PRIVATE_KEY_LEN];
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    /// Derive the corresponding public key.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_k256_verifying_key(self.inner.verifying_key())
    }

    /// Sign a 32-byte message hash.
    ///
    /// ECDSA uses RFC 6979 nonces and always returns a low-S signature.
    /// Schnorr follows BIP-340 with [`SCHNORR_AUX_RAND`] as the auxiliary
    /// input, signing with the even-y form of the key.
    ///
    /// # Returns
    /// The 64-byte compact `r || s` signature.
    pub fn sign(
        &self,
        hash: &[u8; EC_MESSAGE_HASH_LEN],
        algorithm: SignatureAlgorithm,
    ) -> Result<[u8; EC_SIGNATURE_LEN], PrimitivesError> {
        match algorithm {
            SignatureAlgorithm::Ecdsa => self.sign_ecdsa(hash),
            SignatureAlgorithm::Schnorr => self.sign_schnorr(hash),
        }
    }

    fn sign_ecdsa(
        &self,
        hash: &[u8; EC_MESSAGE_HASH_LEN],
    ) -> Result<[u8; EC_SIGNATURE_LEN], PrimitivesError> {
        let (k256_sig, _recovery_id) = self
            .inner
            .sign_prehash_recoverable(hash)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

        let (r_bytes, s_bytes) = k256_sig.split_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&r_bytes);
        s.copy_from_slice(&s_bytes);

        // Low-S normalization
        Ok(CompactSignature::new(r, s)?.normalize().to_bytes())
    }

    fn sign_schnorr(
        &self,
        hash: &[u8; EC_MESSAGE_HASH_LEN],
    ) -> Result<[u8; EC_SIGNATURE_LEN], PrimitivesError> {
        let secret = Zeroizing::new(self.to_bytes());
        let signing_key = schnorr::SigningKey::from_bytes(secret.as_slice())
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        let sig = signing_key
            .sign_raw(hash, &SCHNORR_AUX_RAND)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

        let mut out = [0u8; EC_SIGNATURE_LEN];
        out.copy_from_slice(&sig.to_bytes());
        Ok(out)
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        let a = Zeroizing::new(self.to_bytes());
        let b = Zeroizing::new(other.to_bytes());
        a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

impl Eq for PrivateKey {}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey").finish_non_exhaustive()
    }
}
