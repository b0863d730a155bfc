//! Password-based key derivation: PBKDF2-HMAC-SHA256/512 and scrypt.
//!
//! Output is returned as an owned buffer allocated fallibly; the buffer is
//! wiped if derivation fails. scrypt's expanded blocks and ROMix table are
//! wiped on every exit path. HMAC states held inside the `pbkdf2` crate are
//! not zeroized.

mod scrypt;

pub use scrypt::{scrypt, scrypt_with_params, ScryptParams};

use zeroize::Zeroize;

use crate::mac::{HmacSha256, HmacSha512, HMAC_SHA256_LEN, HMAC_SHA512_LEN};
use crate::PrimitivesError;

/// Block length of [`pbkdf2_hmac_sha256`] output; `len` must be a multiple of it.
pub const PBKDF2_HMAC_SHA256_LEN: usize = HMAC_SHA256_LEN;

/// Block length of [`pbkdf2_hmac_sha512`] output; `len` must be a multiple of it.
pub const PBKDF2_HMAC_SHA512_LEN: usize = HMAC_SHA512_LEN;

/// Derive `len` bytes from `pass` and `salt` with PBKDF2-HMAC-SHA256.
///
/// # Arguments
/// * `pass` - Password to derive from.
/// * `salt` - Salt to derive from.
/// * `flags` - Reserved, must be 0.
/// * `cost` - Iteration count (at least 1).
/// * `len` - Output length, a nonzero multiple of [`PBKDF2_HMAC_SHA256_LEN`].
///
/// # Returns
/// The derived key, or an error if any argument is out of range.
pub fn pbkdf2_hmac_sha256(
    pass: &[u8],
    salt: &[u8],
    flags: u32,
    cost: u32,
    len: usize,
) -> Result<Vec<u8>, PrimitivesError> {
    check_pbkdf2_args(flags, cost, len, PBKDF2_HMAC_SHA256_LEN)?;
    let mut out = try_alloc::<u8>(len, "PBKDF2 output")?;
    if let Err(e) = pbkdf2::pbkdf2::<HmacSha256>(pass, salt, cost, &mut out) {
        out.zeroize();
        return Err(PrimitivesError::InvalidParameter(e.to_string()));
    }
    Ok(out)
}

/// Derive `len` bytes from `pass` and `salt` with PBKDF2-HMAC-SHA512.
///
/// Same contract as [`pbkdf2_hmac_sha256`] with a 64-byte block length.
pub fn pbkdf2_hmac_sha512(
    pass: &[u8],
    salt: &[u8],
    flags: u32,
    cost: u32,
    len: usize,
) -> Result<Vec<u8>, PrimitivesError> {
    check_pbkdf2_args(flags, cost, len, PBKDF2_HMAC_SHA512_LEN)?;
    let mut out = try_alloc::<u8>(len, "PBKDF2 output")?;
    if let Err(e) = pbkdf2::pbkdf2::<HmacSha512>(pass, salt, cost, &mut out) {
        out.zeroize();
        return Err(PrimitivesError::InvalidParameter(e.to_string()));
    }
    Ok(out)
}

fn check_pbkdf2_args(
    flags: u32,
    cost: u32,
    len: usize,
    block_len: usize,
) -> Result<(), PrimitivesError> {
    if flags != 0 {
        return Err(PrimitivesError::InvalidFlags(format!(
            "PBKDF2 flags are reserved and must be 0, got {:#x}",
            flags
        )));
    }
    if cost == 0 {
        return Err(PrimitivesError::InvalidParameter(
            "PBKDF2 cost must be at least 1".to_string(),
        ));
    }
    if len == 0 || len % block_len != 0 {
        return Err(PrimitivesError::InvalidLength {
            what: "PBKDF2 output",
            expected: format!("a nonzero multiple of {}", block_len),
            got: len,
        });
    }
    // The block index is a 32-bit counter.
    if (len / block_len) as u64 > u32::MAX as u64 {
        return Err(PrimitivesError::InvalidParameter(
            "PBKDF2 output too long".to_string(),
        ));
    }
    Ok(())
}

/// Allocate a zero-filled buffer, reporting failure instead of aborting.
fn try_alloc<T: Default + Clone>(len: usize, what: &str) -> Result<Vec<T>, PrimitivesError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| {
        PrimitivesError::AllocationFailed(format!("{}: {} elements", what, len))
    })?;
    buf.resize(len, T::default());
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    // RFC 6070 inputs with SHA-256 / SHA-512 as the PRF.

    #[test]
    fn test_pbkdf2_sha256_vectors() {
        let cases = [
            (1, "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"),
            (2, "ae4d0c95af6b46d32d0adff928f06dd02a303f8ef3c251dfd6e2d85a95474c43"),
            (4096, "c5e478d59288c841aa530db6845c4c8d962893a001ce4e11a4963873aa98134a"),
        ];
        for (cost, expected) in cases {
            let out = pbkdf2_hmac_sha256(b"password", b"salt", 0, cost, 32).unwrap();
            assert_eq!(hex::encode(out), expected, "cost {}", cost);
        }
    }

    #[test]
    fn test_pbkdf2_sha256_multi_block() {
        let out = pbkdf2_hmac_sha256(
            b"passwordPASSWORDpassword",
            b"saltSALTsaltSALTsaltSALTsaltSALTsalt",
            0,
            4096,
            64,
        )
        .unwrap();
        assert_eq!(
            hex::encode(out),
            "348c89dbcbd32b2f32d814b8116e84cf2b17347ebc1800181c4e2a1fb8dd53e1\
             c635518c7dac47e94561f2686056e5fcd3989bf8960bb2a36c90340586c4faca"
        );
    }

    #[test]
    fn test_pbkdf2_sha512_vectors() {
        let out = pbkdf2_hmac_sha512(b"password", b"salt", 0, 1, 64).unwrap();
        assert_eq!(
            hex::encode(out),
            "867f70cf1ade02cff3752599a3a53dc4af34c7a669815ae5d513554e1c8cf252\
             c02d470a285a0501bad999bfe943c08f050235d7d68b1da55e63f73b60a57fce"
        );
        let out = pbkdf2_hmac_sha512(b"password", b"salt", 0, 2, 64).unwrap();
        assert_eq!(
            hex::encode(out),
            "e1d9c16aa681708a45f5c7c4e215ceb66e011a2e9f0040713f18aefdb866d53c\
             f76cab2868a39b9f7840edce4fef5a82be67335c77a6068e04112754f27ccf4e"
        );
    }

    #[test]
    fn test_pbkdf2_sha512_two_blocks() {
        let out = pbkdf2_hmac_sha512(b"password", b"salt", 0, 3, 128).unwrap();
        let first = pbkdf2_hmac_sha512(b"password", b"salt", 0, 3, 64).unwrap();
        assert_eq!(&out[..64], &first[..]);
        assert_eq!(
            hex::encode(&out[64..]),
            "cfc0641fccbcc4164f1bbfcb1f33f595ae9aa4a33ddcce570157775980362c0e\
             e28aa340c842a3ae84710167aea2f9ba34833cbf66a8922e5f165d886868fd3f"
        );
    }

    #[test]
    fn test_pbkdf2_rejects_bad_length() {
        let err = pbkdf2_hmac_sha256(b"password", b"salt", 0, 1, 31).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(pbkdf2_hmac_sha256(b"password", b"salt", 0, 1, 0).is_err());
        assert!(pbkdf2_hmac_sha256(b"password", b"salt", 0, 1, 48).is_err());
        assert!(pbkdf2_hmac_sha512(b"password", b"salt", 0, 1, 32).is_err());
    }

    #[test]
    fn test_pbkdf2_rejects_reserved_flags() {
        let err = pbkdf2_hmac_sha256(b"password", b"salt", 1, 1, 32).unwrap_err();
        assert!(matches!(err, PrimitivesError::InvalidFlags(_)));
        assert!(pbkdf2_hmac_sha512(b"password", b"salt", 0x80, 1, 64).is_err());
    }

    #[test]
    fn test_pbkdf2_rejects_zero_cost() {
        assert!(pbkdf2_hmac_sha256(b"password", b"salt", 0, 0, 32).is_err());
    }

    #[test]
    fn test_try_alloc_reports_failure() {
        let err = try_alloc::<u8>(usize::MAX, "output").unwrap_err();
        assert!(matches!(err, PrimitivesError::AllocationFailed(_)));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(try_alloc::<u32>(4, "output").unwrap(), vec![0u32; 4]);
    }
}
