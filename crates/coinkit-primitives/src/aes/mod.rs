//! AES-128/192/256 block encryption in ECB mode and CBC mode with PKCS#7 padding.
//!
//! The block cipher itself comes from the `aes` crate; the modes and padding
//! are implemented here. CBC decryption validates padding but performs no
//! authentication: a padding error must never be used as an integrity check,
//! and callers should assume padding validity may leak through timing.

use ::aes::cipher::generic_array::GenericArray;
use ::aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use ::aes::{Aes128, Aes192, Aes256};
use zeroize::Zeroize;

use crate::PrimitivesError;

/// Length of an AES block in bytes.
pub const AES_BLOCK_LEN: usize = 16;

/// AES-128 key length.
pub const AES_KEY_LEN_128: usize = 16;
/// AES-192 key length.
pub const AES_KEY_LEN_192: usize = 24;
/// AES-256 key length.
pub const AES_KEY_LEN_256: usize = 32;

/// Numeric flag selecting encryption.
pub const AES_FLAG_ENCRYPT: u32 = 1;
/// Numeric flag selecting decryption.
pub const AES_FLAG_DECRYPT: u32 = 2;

/// Direction of an AES operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AesDirection {
    Encrypt,
    Decrypt,
}

impl AesDirection {
    /// Convert numeric `AES_FLAG_*` flags into a direction.
    ///
    /// Exactly one of [`AES_FLAG_ENCRYPT`] and [`AES_FLAG_DECRYPT`] must be set
    /// and no other bits may be present.
    pub fn from_flags(flags: u32) -> Result<Self, PrimitivesError> {
        match flags {
            AES_FLAG_ENCRYPT => Ok(AesDirection::Encrypt),
            AES_FLAG_DECRYPT => Ok(AesDirection::Decrypt),
            _ => Err(PrimitivesError::InvalidFlags(format!(
                "AES flags must be exactly one of ENCRYPT or DECRYPT, got {:#x}",
                flags
            ))),
        }
    }

    /// The numeric flag for this direction.
    pub fn to_flags(self) -> u32 {
        match self {
            AesDirection::Encrypt => AES_FLAG_ENCRYPT,
            AesDirection::Decrypt => AES_FLAG_DECRYPT,
        }
    }
}

/// An expanded AES key of one of the three supported sizes.
///
/// The key schedule is zeroized when the value is dropped.
pub enum AesKey {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl AesKey {
    /// Expand raw key bytes, selecting the AES variant from the key length.
    ///
    /// # Arguments
    /// * `key` - 16, 24 or 32 key bytes.
    ///
    /// # Returns
    /// The expanded key, or `InvalidLength` for any other key size.
    pub fn new(key: &[u8]) -> Result<Self, PrimitivesError> {
        let invalid = || PrimitivesError::InvalidLength {
            what: "AES key",
            expected: format!(
                "{}, {} or {}",
                AES_KEY_LEN_128, AES_KEY_LEN_192, AES_KEY_LEN_256
            ),
            got: key.len(),
        };
        match key.len() {
            AES_KEY_LEN_128 => Aes128::new_from_slice(key)
                .map(AesKey::Aes128)
                .map_err(|_| invalid()),
            AES_KEY_LEN_192 => Aes192::new_from_slice(key)
                .map(AesKey::Aes192)
                .map_err(|_| invalid()),
            AES_KEY_LEN_256 => Aes256::new_from_slice(key)
                .map(AesKey::Aes256)
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    /// Key length in bytes.
    pub fn key_len(&self) -> usize {
        match self {
            AesKey::Aes128(_) => AES_KEY_LEN_128,
            AesKey::Aes192(_) => AES_KEY_LEN_192,
            AesKey::Aes256(_) => AES_KEY_LEN_256,
        }
    }

    /// Encrypt one 16-byte block in place.
    pub fn encrypt_block(&self, block: &mut [u8; AES_BLOCK_LEN]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            AesKey::Aes128(c) => c.encrypt_block(block),
            AesKey::Aes192(c) => c.encrypt_block(block),
            AesKey::Aes256(c) => c.encrypt_block(block),
        }
    }

    /// Decrypt one 16-byte block in place.
    pub fn decrypt_block(&self, block: &mut [u8; AES_BLOCK_LEN]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            AesKey::Aes128(c) => c.decrypt_block(block),
            AesKey::Aes192(c) => c.decrypt_block(block),
            AesKey::Aes256(c) => c.decrypt_block(block),
        }
    }
}

/// Encrypt or decrypt `data` with AES in ECB mode, without padding.
///
/// # Arguments
/// * `key` - 16, 24 or 32 key bytes.
/// * `data` - Input; a nonzero multiple of [`AES_BLOCK_LEN`].
/// * `direction` - Whether to encrypt or decrypt.
///
/// # Returns
/// Output of the same length as `data`.
pub fn aes(key: &[u8], data: &[u8], direction: AesDirection) -> Result<Vec<u8>, PrimitivesError> {
    let cipher = AesKey::new(key)?;
    check_block_multiple("AES input", data.len())?;

    let mut out = data.to_vec();
    for chunk in out.chunks_exact_mut(AES_BLOCK_LEN) {
        let block = as_block(chunk);
        match direction {
            AesDirection::Encrypt => cipher.encrypt_block(block),
            AesDirection::Decrypt => cipher.decrypt_block(block),
        }
    }
    Ok(out)
}

/// Encrypt or decrypt `data` with AES in CBC mode using PKCS#7 padding.
///
/// Encryption always appends between 1 and 16 padding bytes, so the output is
/// `aes_cbc_output_len(data.len(), Encrypt)` bytes long. Decryption requires a
/// nonzero multiple of [`AES_BLOCK_LEN`] and returns the plaintext with the
/// padding removed; malformed padding is a `DecryptionError`.
///
/// # Arguments
/// * `key` - 16, 24 or 32 key bytes.
/// * `iv` - 16-byte initialization vector.
/// * `data` - Plaintext or ciphertext.
/// * `direction` - Whether to encrypt or decrypt.
pub fn aes_cbc(
    key: &[u8],
    iv: &[u8],
    data: &[u8],
    direction: AesDirection,
) -> Result<Vec<u8>, PrimitivesError> {
    let cipher = AesKey::new(key)?;
    if iv.len() != AES_BLOCK_LEN {
        return Err(PrimitivesError::length("IV", AES_BLOCK_LEN, iv.len()));
    }
    let mut chain = [0u8; AES_BLOCK_LEN];
    chain.copy_from_slice(iv);

    match direction {
        AesDirection::Encrypt => Ok(cbc_encrypt(&cipher, &chain, data)),
        AesDirection::Decrypt => {
            check_block_multiple("AES-CBC ciphertext", data.len())?;
            cbc_decrypt(&cipher, &chain, data)
        }
    }
}

/// Maximum number of bytes [`aes_cbc`] writes for an input of `len_in` bytes.
///
/// For encryption this is exact: `len_in` rounded up to the next block
/// boundary, plus a full block when `len_in` is already aligned. For
/// decryption the real plaintext is 1 to 16 bytes shorter.
pub fn aes_cbc_output_len(len_in: usize, direction: AesDirection) -> usize {
    match direction {
        AesDirection::Encrypt => (len_in / AES_BLOCK_LEN + 1) * AES_BLOCK_LEN,
        AesDirection::Decrypt => len_in,
    }
}

fn cbc_encrypt(cipher: &AesKey, iv: &[u8; AES_BLOCK_LEN], data: &[u8]) -> Vec<u8> {
    let out_len = aes_cbc_output_len(data.len(), AesDirection::Encrypt);
    let pad = (out_len - data.len()) as u8;

    let mut out = Vec::with_capacity(out_len);
    out.extend_from_slice(data);
    out.resize(out_len, pad);

    let mut prev = *iv;
    for chunk in out.chunks_exact_mut(AES_BLOCK_LEN) {
        let block = as_block(chunk);
        xor_block(block, &prev);
        cipher.encrypt_block(block);
        prev = *block;
    }
    out
}

fn cbc_decrypt(
    cipher: &AesKey,
    iv: &[u8; AES_BLOCK_LEN],
    data: &[u8],
) -> Result<Vec<u8>, PrimitivesError> {
    let mut out = data.to_vec();
    let mut prev = *iv;
    for chunk in out.chunks_exact_mut(AES_BLOCK_LEN) {
        let block = as_block(chunk);
        let ciphertext = *block;
        cipher.decrypt_block(block);
        xor_block(block, &prev);
        prev = ciphertext;
    }

    match pkcs7_padding_len(&out) {
        Some(pad) => {
            let plain_len = out.len() - pad;
            out[plain_len..].zeroize();
            out.truncate(plain_len);
            Ok(out)
        }
        None => {
            out.zeroize();
            Err(PrimitivesError::DecryptionError(
                "invalid PKCS#7 padding".to_string(),
            ))
        }
    }
}

/// Length of valid PKCS#7 padding at the end of `data`, if any.
///
/// Inspects the whole final block regardless of the pad value.
fn pkcs7_padding_len(data: &[u8]) -> Option<usize> {
    let last = &data[data.len() - AES_BLOCK_LEN..];
    let pad = last[AES_BLOCK_LEN - 1];
    let mut bad = ((pad == 0) as u8) | ((pad as usize > AES_BLOCK_LEN) as u8);
    for (i, &b) in last.iter().enumerate() {
        let in_pad = (AES_BLOCK_LEN - i <= pad as usize) as u8;
        bad |= in_pad & ((b != pad) as u8);
    }
    if bad == 0 {
        Some(pad as usize)
    } else {
        None
    }
}

fn check_block_multiple(what: &'static str, len: usize) -> Result<(), PrimitivesError> {
    if len == 0 || len % AES_BLOCK_LEN != 0 {
        return Err(PrimitivesError::InvalidLength {
            what,
            expected: format!("a nonzero multiple of {}", AES_BLOCK_LEN),
            got: len,
        });
    }
    Ok(())
}

fn as_block(chunk: &mut [u8]) -> &mut [u8; AES_BLOCK_LEN] {
    chunk
        .try_into()
        .expect("chunks_exact_mut yields whole blocks")
}

fn xor_block(block: &mut [u8; AES_BLOCK_LEN], other: &[u8; AES_BLOCK_LEN]) {
    for (b, o) in block.iter_mut().zip(other.iter()) {
        *b ^= o;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const FIPS_PLAINTEXT: &str = "00112233445566778899aabbccddeeff";

    fn sequential_key(len: usize) -> Vec<u8> {
        (0..len as u8).collect()
    }

    // FIPS-197 appendix C.

    #[test]
    fn test_aes_ecb_fips197() {
        let cases = [
            (AES_KEY_LEN_128, "69c4e0d86a7b0430d8cdb78070b4c55a"),
            (AES_KEY_LEN_192, "dda97ca4864cdfe06eaf70a0ec0d7191"),
            (AES_KEY_LEN_256, "8ea2b7ca516745bfeafc49904b496089"),
        ];
        let plaintext = hex::decode(FIPS_PLAINTEXT).unwrap();
        for (key_len, expected) in cases {
            let key = sequential_key(key_len);
            let ciphertext = aes(&key, &plaintext, AesDirection::Encrypt).unwrap();
            assert_eq!(hex::encode(&ciphertext), expected, "AES-{}", key_len * 8);
            let decrypted = aes(&key, &ciphertext, AesDirection::Decrypt).unwrap();
            assert_eq!(decrypted, plaintext);
        }
    }

    #[test]
    fn test_aes_ecb_blocks_are_independent() {
        let key = sequential_key(AES_KEY_LEN_128);
        let block = hex::decode(FIPS_PLAINTEXT).unwrap();
        let doubled = [block.clone(), block].concat();
        let out = aes(&key, &doubled, AesDirection::Encrypt).unwrap();
        assert_eq!(out[..16], out[16..]);
    }

    #[test]
    fn test_aes_ecb_rejects_bad_lengths() {
        let key = sequential_key(AES_KEY_LEN_128);
        assert!(aes(&key, &[], AesDirection::Encrypt).is_err());
        assert!(aes(&key, &[0u8; 15], AesDirection::Encrypt).is_err());
        assert!(aes(&key, &[0u8; 17], AesDirection::Decrypt).is_err());
        let err = aes(&[0u8; 20], &[0u8; 16], AesDirection::Encrypt).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_aes_direction_from_flags() {
        assert_eq!(
            AesDirection::from_flags(AES_FLAG_ENCRYPT).unwrap(),
            AesDirection::Encrypt
        );
        assert_eq!(
            AesDirection::from_flags(AES_FLAG_DECRYPT).unwrap(),
            AesDirection::Decrypt
        );
        assert!(AesDirection::from_flags(0).is_err());
        assert!(AesDirection::from_flags(AES_FLAG_ENCRYPT | AES_FLAG_DECRYPT).is_err());
        assert!(AesDirection::from_flags(4).is_err());
        assert_eq!(AesDirection::Decrypt.to_flags(), AES_FLAG_DECRYPT);
    }

    // NIST SP 800-38A F.2.1 and F.2.5, plus the trailing PKCS#7 block.

    #[test]
    fn test_aes_cbc_sp800_38a_aes128() {
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let iv = sequential_key(AES_BLOCK_LEN);
        let plaintext = hex::decode(
            "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51",
        )
        .unwrap();
        let ciphertext = aes_cbc(&key, &iv, &plaintext, AesDirection::Encrypt).unwrap();
        assert_eq!(
            hex::encode(&ciphertext),
            "7649abac8119b246cee98e9b12e9197d5086cb9b507219ee95db113a917678b2\
             55e21d7100b988ffec32feeafaf23538"
        );
        let decrypted = aes_cbc(&key, &iv, &ciphertext, AesDirection::Decrypt).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_aes_cbc_sp800_38a_aes256() {
        let key = hex::decode("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4")
            .unwrap();
        let iv = sequential_key(AES_BLOCK_LEN);
        let plaintext = hex::decode(
            "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51",
        )
        .unwrap();
        let ciphertext = aes_cbc(&key, &iv, &plaintext, AesDirection::Encrypt).unwrap();
        assert_eq!(
            hex::encode(&ciphertext),
            "f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d\
             3a3aa5e0213db1a9901f9036cf5102d2"
        );
    }

    #[test]
    fn test_aes_cbc_aes192_short_message() {
        let key = hex::decode("8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b").unwrap();
        let iv = sequential_key(AES_BLOCK_LEN);
        let ciphertext = aes_cbc(&key, &iv, b"hello world", AesDirection::Encrypt).unwrap();
        assert_eq!(hex::encode(&ciphertext), "d403597f13c92a341e7f8582f714448a");
        let decrypted = aes_cbc(&key, &iv, &ciphertext, AesDirection::Decrypt).unwrap();
        assert_eq!(decrypted, b"hello world");
    }

    #[test]
    fn test_aes_cbc_empty_input_is_one_padding_block() {
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let iv = sequential_key(AES_BLOCK_LEN);
        let ciphertext = aes_cbc(&key, &iv, &[], AesDirection::Encrypt).unwrap();
        assert_eq!(hex::encode(&ciphertext), "c84af0b613435d5d9182801a9bd9320b");
        let decrypted = aes_cbc(&key, &iv, &ciphertext, AesDirection::Decrypt).unwrap();
        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_aes_cbc_output_len() {
        assert_eq!(aes_cbc_output_len(0, AesDirection::Encrypt), 16);
        assert_eq!(aes_cbc_output_len(15, AesDirection::Encrypt), 16);
        assert_eq!(aes_cbc_output_len(16, AesDirection::Encrypt), 32);
        assert_eq!(aes_cbc_output_len(17, AesDirection::Encrypt), 32);
        assert_eq!(aes_cbc_output_len(48, AesDirection::Decrypt), 48);
    }

    #[test]
    fn test_aes_cbc_rejects_bad_padding() {
        let key = sequential_key(AES_KEY_LEN_128);
        let iv = [0u8; AES_BLOCK_LEN];
        // Encrypt raw blocks with ECB so the "plaintext" padding is under our control:
        // with an all-zero IV, CBC of one block equals ECB of that block.
        for last in [0x00u8, 0x11, 0xff] {
            let mut block = [0x41u8; AES_BLOCK_LEN];
            block[AES_BLOCK_LEN - 1] = last;
            let ciphertext = aes(&key, &block, AesDirection::Encrypt).unwrap();
            let err = aes_cbc(&key, &iv, &ciphertext, AesDirection::Decrypt).unwrap_err();
            assert!(matches!(err, PrimitivesError::DecryptionError(_)), "pad {:#x}", last);
        }

        // Pad value 3 but the preceding bytes disagree.
        let mut block = [0x41u8; AES_BLOCK_LEN];
        block[13] = 0x02;
        block[14] = 0x03;
        block[15] = 0x03;
        let ciphertext = aes(&key, &block, AesDirection::Encrypt).unwrap();
        assert!(aes_cbc(&key, &iv, &ciphertext, AesDirection::Decrypt).is_err());

        // Full block of 0x10 is valid and strips to nothing.
        let block = [0x10u8; AES_BLOCK_LEN];
        let ciphertext = aes(&key, &block, AesDirection::Encrypt).unwrap();
        let plain = aes_cbc(&key, &iv, &ciphertext, AesDirection::Decrypt).unwrap();
        assert!(plain.is_empty());
    }

    #[test]
    fn test_aes_cbc_rejects_bad_arguments() {
        let key = sequential_key(AES_KEY_LEN_256);
        assert!(aes_cbc(&key, &[0u8; 15], b"data", AesDirection::Encrypt).is_err());
        assert!(aes_cbc(&key, &[0u8; 16], &[], AesDirection::Decrypt).is_err());
        assert!(aes_cbc(&key, &[0u8; 16], &[0u8; 20], AesDirection::Decrypt).is_err());
        assert!(aes_cbc(&key[..31], &[0u8; 16], b"data", AesDirection::Encrypt).is_err());
    }

    #[test]
    fn test_aes_key_lengths() {
        for len in [AES_KEY_LEN_128, AES_KEY_LEN_192, AES_KEY_LEN_256] {
            assert_eq!(AesKey::new(&sequential_key(len)).unwrap().key_len(), len);
        }
        assert!(AesKey::new(&[]).is_err());
        assert!(AesKey::new(&[0u8; 64]).is_err());
    }
}
