//! Elliptic curve cryptography on secp256k1.
//!
//! Private/public key validation and derivation, ECDSA and BIP-340 Schnorr
//! signing and verification behind a single algorithm selector, compact/DER
//! signature conversion and low-S normalization. Curve arithmetic is provided
//! by `k256`.
//!
//! The free functions in this module take raw byte slices and validate every
//! length and scalar range before touching the curve; the key and signature
//! types underneath are available for callers that want to keep parsed values.

pub mod private_key;
pub mod public_key;
pub mod signature;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::CompactSignature;

use crate::PrimitivesError;

/// Length of a private key.
pub const EC_PRIVATE_KEY_LEN: usize = 32;
/// Length of a compressed public key.
pub const EC_PUBLIC_KEY_LEN: usize = 33;
/// Length of an uncompressed public key.
pub const EC_PUBLIC_KEY_UNCOMPRESSED_LEN: usize = 65;
/// Length of a message hash to sign.
pub const EC_MESSAGE_HASH_LEN: usize = 32;
/// Length of a compact signature.
pub const EC_SIGNATURE_LEN: usize = 64;
/// Maximum length of a DER encoded signature.
pub const EC_SIGNATURE_DER_MAX_LEN: usize = 72;

/// Numeric flag selecting ECDSA.
pub const EC_FLAG_ECDSA: u32 = 0x1;
/// Numeric flag selecting Schnorr.
pub const EC_FLAG_SCHNORR: u32 = 0x2;

/// Signature scheme used by [`sig_from_bytes`] and [`sig_verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// ECDSA with RFC 6979 nonces, always producing low-S signatures.
    Ecdsa,
    /// BIP-340 Schnorr over the x-coordinate of the public key.
    Schnorr,
}

impl SignatureAlgorithm {
    /// Convert numeric `EC_FLAG_*` flags into an algorithm.
    ///
    /// Exactly one of [`EC_FLAG_ECDSA`] and [`EC_FLAG_SCHNORR`] must be set;
    /// both, neither, or unknown bits are rejected.
    pub fn from_flags(flags: u32) -> Result<Self, PrimitivesError> {
        match flags {
            EC_FLAG_ECDSA => Ok(SignatureAlgorithm::Ecdsa),
            EC_FLAG_SCHNORR => Ok(SignatureAlgorithm::Schnorr),
            _ => Err(PrimitivesError::InvalidFlags(format!(
                "EC flags must be exactly one of ECDSA or SCHNORR, got {:#x}",
                flags
            ))),
        }
    }

    /// The numeric flag for this algorithm.
    pub fn to_flags(self) -> u32 {
        match self {
            SignatureAlgorithm::Ecdsa => EC_FLAG_ECDSA,
            SignatureAlgorithm::Schnorr => EC_FLAG_SCHNORR,
        }
    }
}

/// Check that `priv_key` is a valid secp256k1 private key.
///
/// Succeeds iff it is 32 bytes encoding a big-endian integer in `[1, n-1]`.
pub fn private_key_verify(priv_key: &[u8]) -> Result<(), PrimitivesError> {
    PrivateKey::from_bytes(priv_key).map(|_| ())
}

/// Check that `pub_key` is a valid compressed (33-byte) or uncompressed
/// (65-byte) SEC1 public key on the curve.
pub fn public_key_verify(pub_key: &[u8]) -> Result<(), PrimitivesError> {
    PublicKey::from_bytes(pub_key).map(|_| ())
}

/// Derive the compressed public key for a private key.
pub fn public_key_from_private_key(
    priv_key: &[u8],
) -> Result<[u8; EC_PUBLIC_KEY_LEN], PrimitivesError> {
    Ok(PrivateKey::from_bytes(priv_key)?.pub_key().to_compressed())
}

/// Expand a compressed public key into its uncompressed form.
pub fn public_key_decompress(
    pub_key: &[u8],
) -> Result<[u8; EC_PUBLIC_KEY_UNCOMPRESSED_LEN], PrimitivesError> {
    Ok(PublicKey::from_compressed(pub_key)?.to_uncompressed())
}

/// Sign a 32-byte message hash, returning the compact `r || s` signature.
///
/// ECDSA signatures use RFC 6979 nonces and are low-S. Schnorr signatures
/// follow BIP-340 with an all-zero auxiliary input, so both algorithms are
/// deterministic.
pub fn sig_from_bytes(
    priv_key: &[u8],
    hash: &[u8],
    algorithm: SignatureAlgorithm,
) -> Result<[u8; EC_SIGNATURE_LEN], PrimitivesError> {
    let key = PrivateKey::from_bytes(priv_key)?;
    let hash = message_hash(hash)?;
    key.sign(&hash, algorithm)
}

/// Convert a compact ECDSA signature to low-S form.
pub fn sig_normalize(sig: &[u8]) -> Result<[u8; EC_SIGNATURE_LEN], PrimitivesError> {
    Ok(CompactSignature::from_bytes(sig)?.normalize().to_bytes())
}

/// Encode a compact signature as minimal DER (at most 72 bytes).
pub fn sig_to_der(sig: &[u8]) -> Result<Vec<u8>, PrimitivesError> {
    Ok(CompactSignature::from_bytes(sig)?.to_der())
}

/// Decode a strictly minimal DER signature into compact form.
pub fn sig_from_der(der: &[u8]) -> Result<[u8; EC_SIGNATURE_LEN], PrimitivesError> {
    Ok(CompactSignature::from_der(der)?.to_bytes())
}

/// Verify a compact signature over a 32-byte hash.
///
/// Wrong buffer lengths are errors. Every other failure (unparseable key,
/// out-of-range `r` or `s`, high-S ECDSA, mismatch) is reported identically
/// as `Ok(false)`.
pub fn sig_verify(
    pub_key: &[u8],
    hash: &[u8],
    algorithm: SignatureAlgorithm,
    sig: &[u8],
) -> Result<bool, PrimitivesError> {
    if pub_key.len() != EC_PUBLIC_KEY_LEN {
        return Err(PrimitivesError::length(
            "public key",
            EC_PUBLIC_KEY_LEN,
            pub_key.len(),
        ));
    }
    let hash = message_hash(hash)?;
    if sig.len() != EC_SIGNATURE_LEN {
        return Err(PrimitivesError::length("signature", EC_SIGNATURE_LEN, sig.len()));
    }
    let mut compact = [0u8; EC_SIGNATURE_LEN];
    compact.copy_from_slice(sig);

    Ok(match PublicKey::from_compressed(pub_key) {
        Ok(key) => key.verify(&hash, algorithm, &compact),
        Err(_) => false,
    })
}

fn message_hash(hash: &[u8]) -> Result<[u8; EC_MESSAGE_HASH_LEN], PrimitivesError> {
    hash.try_into().map_err(|_| {
        PrimitivesError::length("message hash", EC_MESSAGE_HASH_LEN, hash.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256;
    use crate::ErrorKind;

    fn key_from_u8(v: u8) -> [u8; 32] {
        let mut k = [0u8; 32];
        k[31] = v;
        k
    }

    #[test]
    fn test_algorithm_from_flags() {
        assert_eq!(
            SignatureAlgorithm::from_flags(EC_FLAG_ECDSA).unwrap(),
            SignatureAlgorithm::Ecdsa
        );
        assert_eq!(
            SignatureAlgorithm::from_flags(EC_FLAG_SCHNORR).unwrap(),
            SignatureAlgorithm::Schnorr
        );
        for bad in [0, EC_FLAG_ECDSA | EC_FLAG_SCHNORR, 0x4, 0x5] {
            let err = SignatureAlgorithm::from_flags(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
        assert_eq!(SignatureAlgorithm::Schnorr.to_flags(), EC_FLAG_SCHNORR);
    }

    #[test]
    fn test_private_key_verify_range() {
        assert!(private_key_verify(&key_from_u8(1)).is_ok());
        assert!(private_key_verify(&[0u8; 32]).is_err());
        assert!(private_key_verify(&[0xffu8; 32]).is_err());
        assert!(private_key_verify(&key_from_u8(1)[..31]).is_err());

        let order =
            hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
                .unwrap();
        assert!(private_key_verify(&order).is_err());
        let order_minus_one =
            hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140")
                .unwrap();
        assert!(private_key_verify(&order_minus_one).is_ok());
    }

    #[test]
    fn test_public_key_from_private_key_generator() {
        let pub_key = public_key_from_private_key(&key_from_u8(1)).unwrap();
        assert_eq!(
            hex::encode(pub_key),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert!(public_key_from_private_key(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_public_key_decompress_generator() {
        let compressed = public_key_from_private_key(&key_from_u8(1)).unwrap();
        let uncompressed = public_key_decompress(&compressed).unwrap();
        assert_eq!(
            hex::encode(uncompressed),
            "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798\
             483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
        );
        assert!(public_key_verify(&uncompressed).is_ok());
    }

    #[test]
    fn test_public_key_decompress_rejects_invalid() {
        // x = 5 is not on secp256k1.
        let mut not_on_curve = [0u8; 33];
        not_on_curve[0] = 0x02;
        not_on_curve[32] = 0x05;
        assert!(public_key_decompress(&not_on_curve).is_err());

        let compressed = public_key_from_private_key(&key_from_u8(1)).unwrap();
        let mut bad_prefix = compressed;
        bad_prefix[0] = 0x04;
        assert!(public_key_decompress(&bad_prefix).is_err());
        assert!(public_key_decompress(&compressed[..32]).is_err());
    }

    #[test]
    fn test_sign_and_verify_both_algorithms() {
        let priv_key = key_from_u8(42);
        let pub_key = public_key_from_private_key(&priv_key).unwrap();
        let hash = sha256(b"sign me");
        for algorithm in [SignatureAlgorithm::Ecdsa, SignatureAlgorithm::Schnorr] {
            let sig = sig_from_bytes(&priv_key, &hash, algorithm).unwrap();
            assert!(sig_verify(&pub_key, &hash, algorithm, &sig).unwrap());

            let other = sha256(b"sign you");
            assert!(!sig_verify(&pub_key, &other, algorithm, &sig).unwrap());
        }
    }

    #[test]
    fn test_signature_algorithms_are_not_interchangeable() {
        let priv_key = key_from_u8(7);
        let pub_key = public_key_from_private_key(&priv_key).unwrap();
        let hash = sha256(b"algorithm confusion");
        let ecdsa = sig_from_bytes(&priv_key, &hash, SignatureAlgorithm::Ecdsa).unwrap();
        let schnorr = sig_from_bytes(&priv_key, &hash, SignatureAlgorithm::Schnorr).unwrap();
        assert_ne!(ecdsa, schnorr);
        assert!(!sig_verify(&pub_key, &hash, SignatureAlgorithm::Schnorr, &ecdsa).unwrap());
        assert!(!sig_verify(&pub_key, &hash, SignatureAlgorithm::Ecdsa, &schnorr).unwrap());
    }

    #[test]
    fn test_sig_from_bytes_rejects_bad_inputs() {
        let hash = sha256(b"x");
        assert!(sig_from_bytes(&[0u8; 32], &hash, SignatureAlgorithm::Ecdsa).is_err());
        assert!(sig_from_bytes(&key_from_u8(1), &hash[..31], SignatureAlgorithm::Ecdsa).is_err());
        assert!(sig_from_bytes(&key_from_u8(1)[..31], &hash, SignatureAlgorithm::Schnorr).is_err());
    }

    #[test]
    fn test_sig_verify_length_errors_and_silent_failures() {
        let priv_key = key_from_u8(3);
        let pub_key = public_key_from_private_key(&priv_key).unwrap();
        let hash = sha256(b"verify");
        let sig = sig_from_bytes(&priv_key, &hash, SignatureAlgorithm::Ecdsa).unwrap();

        assert!(sig_verify(&pub_key[..32], &hash, SignatureAlgorithm::Ecdsa, &sig).is_err());
        assert!(sig_verify(&pub_key, &hash[..16], SignatureAlgorithm::Ecdsa, &sig).is_err());
        assert!(sig_verify(&pub_key, &hash, SignatureAlgorithm::Ecdsa, &sig[..63]).is_err());

        // A key that is not on the curve, a zero r and an overflowing s all
        // fail the same way.
        let mut bad_key = pub_key;
        bad_key[0] = 0x05;
        assert!(!sig_verify(&bad_key, &hash, SignatureAlgorithm::Ecdsa, &sig).unwrap());
        let mut zero_r = sig;
        zero_r[..32].fill(0);
        assert!(!sig_verify(&pub_key, &hash, SignatureAlgorithm::Ecdsa, &zero_r).unwrap());
        let mut big_s = sig;
        big_s[32..].fill(0xff);
        assert!(!sig_verify(&pub_key, &hash, SignatureAlgorithm::Ecdsa, &big_s).unwrap());
    }

    #[test]
    fn test_sig_to_der_and_back() {
        let priv_key = key_from_u8(9);
        let hash = sha256(b"der round trip");
        let sig = sig_from_bytes(&priv_key, &hash, SignatureAlgorithm::Ecdsa).unwrap();
        let der = sig_to_der(&sig).unwrap();
        assert!(der.len() <= EC_SIGNATURE_DER_MAX_LEN);
        assert_eq!(sig_from_der(&der).unwrap(), sig);
    }

    #[test]
    fn test_sig_normalize_flips_high_s() {
        let priv_key = key_from_u8(11);
        let pub_key = public_key_from_private_key(&priv_key).unwrap();
        let hash = sha256(b"malleable");
        let low = sig_from_bytes(&priv_key, &hash, SignatureAlgorithm::Ecdsa).unwrap();

        let high = CompactSignature::from_bytes(&low).unwrap().negate_s().to_bytes();
        assert_ne!(high, low);
        // High-S signatures are not accepted by verification.
        assert!(!sig_verify(&pub_key, &hash, SignatureAlgorithm::Ecdsa, &high).unwrap());
        assert_eq!(sig_normalize(&high).unwrap(), low);
        assert_eq!(sig_normalize(&low).unwrap(), low);
    }
}
