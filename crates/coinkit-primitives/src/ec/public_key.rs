//! secp256k1 public key.
//!
//! Supports compressed/uncompressed SEC1 serialization, decompression and
//! signature verification for both ECDSA and BIP-340 Schnorr.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{self, VerifyingKey};
use k256::schnorr;

use crate::ec::signature::CompactSignature;
use crate::ec::{
    SignatureAlgorithm, EC_MESSAGE_HASH_LEN, EC_PUBLIC_KEY_LEN, EC_PUBLIC_KEY_UNCOMPRESSED_LEN,
    EC_SIGNATURE_LEN,
};
use crate::hash::hash160;
use crate::PrimitivesError;

/// A secp256k1 public key.
///
/// Always a valid point on the curve, never the identity.
#[derive(Clone, Debug)]
pub struct PublicKey {
    /// The underlying k256 verifying key.
    inner: VerifyingKey,
}

impl PublicKey {
    /// Create a PublicKey from SEC1 encoded bytes.
    ///
    /// Accepts compressed (33-byte, prefix `02`/`03`) and uncompressed
    /// (65-byte, prefix `04`) encodings. Hybrid encodings are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        match bytes.len() {
            EC_PUBLIC_KEY_LEN => Self::from_compressed(bytes),
            EC_PUBLIC_KEY_UNCOMPRESSED_LEN => {
                if bytes[0] != 0x04 {
                    return Err(PrimitivesError::InvalidPublicKey(format!(
                        "invalid uncompressed prefix {:#04x}",
                        bytes[0]
                    )));
                }
                Self::parse_sec1(bytes)
            }
            n => Err(PrimitivesError::InvalidLength {
                what: "public key",
                expected: format!("{} or {}", EC_PUBLIC_KEY_LEN, EC_PUBLIC_KEY_UNCOMPRESSED_LEN),
                got: n,
            }),
        }
    }

    /// Create a PublicKey from a 33-byte compressed encoding.
    ///
    /// The x-coordinate must lie on the curve; the prefix selects the parity
    /// of y.
    pub fn from_compressed(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != EC_PUBLIC_KEY_LEN {
            return Err(PrimitivesError::length(
                "compressed public key",
                EC_PUBLIC_KEY_LEN,
                bytes.len(),
            ));
        }
        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(PrimitivesError::InvalidPublicKey(format!(
                "invalid compressed prefix {:#04x}",
                bytes[0]
            )));
        }
        Self::parse_sec1(bytes)
    }

    fn parse_sec1(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let vk = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|_| PrimitivesError::InvalidPublicKey("point is not on the curve".to_string()))?;
        Ok(PublicKey { inner: vk })
    }

    /// Serialize the public key in compressed SEC1 format (33 bytes).
    pub fn to_compressed(&self) -> [u8; EC_PUBLIC_KEY_LEN] {
        let point = self.inner.to_encoded_point(true);
        let mut out = [0u8; EC_PUBLIC_KEY_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Serialize the public key in uncompressed SEC1 format (65 bytes).
    ///
    /// The first byte is 0x04, followed by 32-byte X and 32-byte Y coordinates.
    pub fn to_uncompressed(&self) -> [u8; EC_PUBLIC_KEY_UNCOMPRESSED_LEN] {
        let point = self.inner.to_encoded_point(false);
        let mut out = [0u8; EC_PUBLIC_KEY_UNCOMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// The 32-byte x-coordinate, used as the BIP-340 public key.
    pub fn x_only(&self) -> [u8; 32] {
        let compressed = self.to_compressed();
        let mut out = [0u8; 32];
        out.copy_from_slice(&compressed[1..]);
        out
    }

    /// Compute the Hash160 of the compressed public key.
    ///
    /// Hash160 = RIPEMD160(SHA256(compressed_pubkey)).
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_compressed())
    }

    /// Verify a compact signature over a 32-byte hash.
    ///
    /// ECDSA signatures must have `r` and `s` in `[1, n-1]` and be low-S.
    /// Schnorr signatures are checked against [`PublicKey::x_only`]. Every
    /// failure returns `false`.
    pub fn verify(
        &self,
        hash: &[u8; EC_MESSAGE_HASH_LEN],
        algorithm: SignatureAlgorithm,
        sig: &[u8; EC_SIGNATURE_LEN],
    ) -> bool {
        match algorithm {
            SignatureAlgorithm::Ecdsa => self.verify_ecdsa(hash, sig),
            SignatureAlgorithm::Schnorr => self.verify_schnorr(hash, sig),
        }
    }

    fn verify_ecdsa(&self, hash: &[u8; EC_MESSAGE_HASH_LEN], sig: &[u8; EC_SIGNATURE_LEN]) -> bool {
        let compact = match CompactSignature::from_bytes(sig) {
            Ok(compact) if compact.is_low_s() => compact,
            _ => return false,
        };
        let k256_sig = match ecdsa::Signature::from_scalars(
            k256::FieldBytes::from(*compact.r()),
            k256::FieldBytes::from(*compact.s()),
        ) {
            Ok(sig) => sig,
            Err(_) => return false,
        };
        self.inner.verify_prehash(hash, &k256_sig).is_ok()
    }

    fn verify_schnorr(&self, hash: &[u8; EC_MESSAGE_HASH_LEN], sig: &[u8; EC_SIGNATURE_LEN]) -> bool {
        let key = match schnorr::VerifyingKey::from_bytes(&self.x_only()) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let sig = match schnorr::Signature::try_from(sig.as_slice()) {
            Ok(sig) => sig,
            Err(_) => return false,
        };
        key.verify_raw(hash, &sig).is_ok()
    }

    pub(crate) fn from_k256_verifying_key(vk: &VerifyingKey) -> Self {
        PublicKey { inner: *vk }
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_compressed() == other.to_compressed()
    }
}

impl Eq for PublicKey {}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in self.to_compressed() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
