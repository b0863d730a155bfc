//! Bitcoin signed-message signing and verification.
//!
//! Signs the double SHA-256 of the [`crate::format`] preimage with either
//! ECDSA or Schnorr.

use coinkit_primitives::ec::{PrivateKey, PublicKey, SignatureAlgorithm};
use coinkit_primitives::EC_SIGNATURE_LEN;

use crate::format::bitcoin_message_hash;
use crate::MessageError;

/// Sign `message` as a Bitcoin signed message.
///
/// # Returns
/// The 64-byte compact signature over [`bitcoin_message_hash`].
pub fn sign_message(
    signer: &PrivateKey,
    message: &[u8],
    algorithm: SignatureAlgorithm,
) -> Result<[u8; EC_SIGNATURE_LEN], MessageError> {
    let digest = bitcoin_message_hash(message)?;
    Ok(signer.sign(&digest, algorithm)?)
}

/// Verify a compact signature produced by [`sign_message`].
///
/// Returns `Ok(false)` for any signature that does not verify; errors are
/// reserved for an oversized message.
pub fn verify_message(
    signer: &PublicKey,
    message: &[u8],
    algorithm: SignatureAlgorithm,
    sig: &[u8; EC_SIGNATURE_LEN],
) -> Result<bool, MessageError> {
    let digest = bitcoin_message_hash(message)?;
    Ok(signer.verify(&digest, algorithm, sig))
}
