//! Compact ECDSA signature with strict DER serialization and low-S
//! normalization.
//!
//! A [`CompactSignature`] is the 64-byte `r || s` form. Both halves are
//! big-endian integers in `[1, n-1]`; construction enforces that range so the
//! DER encoder never sees a value it cannot represent minimally.

use crate::ec::{EC_SIGNATURE_DER_MAX_LEN, EC_SIGNATURE_LEN};
use crate::PrimitivesError;

/// The secp256k1 curve order N.
/// N = FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
    0x41, 0x41,
];

/// Half of the secp256k1 curve order (N/2), used for low-S normalization.
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B,
    0x20, 0xA0,
];

/// Smallest well-formed DER signature: two one-byte INTEGERs.
const DER_MIN_LEN: usize = 8;

const DER_SEQUENCE: u8 = 0x30;
const DER_INTEGER: u8 = 0x02;

/// An ECDSA signature with R and S components, each in `[1, n-1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompactSignature {
    /// The R component (32 bytes, big-endian).
    r: [u8; 32],
    /// The S component (32 bytes, big-endian).
    s: [u8; 32],
}

impl CompactSignature {
    /// Create a signature from R and S, checking both lie in `[1, n-1]`.
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Result<Self, PrimitivesError> {
        check_scalar("R", &r)?;
        check_scalar("S", &s)?;
        Ok(CompactSignature { r, s })
    }

    /// Parse the 64-byte compact `r || s` form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != EC_SIGNATURE_LEN {
            return Err(PrimitivesError::length(
                "signature",
                EC_SIGNATURE_LEN,
                bytes.len(),
            ));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Self::new(r, s)
    }

    /// Serialize as the 64-byte compact `r || s` form.
    pub fn to_bytes(&self) -> [u8; EC_SIGNATURE_LEN] {
        let mut out = [0u8; EC_SIGNATURE_LEN];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }

    /// Access the R component of the signature.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// Access the S component of the signature.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Whether S is in the lower half of the curve order.
    pub fn is_low_s(&self) -> bool {
        !is_greater_than(&self.s, &HALF_ORDER)
    }

    /// Return the low-S form of this signature.
    ///
    /// If `s > n/2`, `s` is replaced by `n - s`; `r` is unchanged. Applying
    /// this to an already low-S signature returns it unchanged.
    pub fn normalize(&self) -> Self {
        if self.is_low_s() {
            *self
        } else {
            self.negate_s()
        }
    }

    /// Return the signature with `s` replaced by `n - s`.
    ///
    /// Both forms verify under plain ECDSA; this is the malleated twin.
    pub fn negate_s(&self) -> Self {
        CompactSignature {
            r: self.r,
            s: subtract_from_order(&self.s),
        }
    }

    /// Parse a strictly minimal DER-encoded ECDSA signature.
    ///
    /// Expected format: 0x30 <len> 0x02 <r_len> <r> 0x02 <s_len> <s>, with no
    /// trailing bytes. Each INTEGER must be positive, carry a leading zero byte
    /// only when its high bit would otherwise be set, and fit in 32 bytes.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() < DER_MIN_LEN || bytes.len() > EC_SIGNATURE_DER_MAX_LEN {
            return Err(PrimitivesError::InvalidDer(format!(
                "length {} outside {}..={}",
                bytes.len(),
                DER_MIN_LEN,
                EC_SIGNATURE_DER_MAX_LEN
            )));
        }
        if bytes[0] != DER_SEQUENCE {
            return Err(PrimitivesError::InvalidDer("no sequence header".to_string()));
        }
        if bytes[1] as usize != bytes.len() - 2 {
            return Err(PrimitivesError::InvalidDer(
                "sequence length does not match input".to_string(),
            ));
        }

        let (r_bytes, rest) = read_integer(&bytes[2..], "R")?;
        let (s_bytes, rest) = read_integer(rest, "S")?;
        if !rest.is_empty() {
            return Err(PrimitivesError::InvalidDer(
                "trailing bytes after S".to_string(),
            ));
        }

        let r = to_32_bytes(r_bytes);
        let s = to_32_bytes(s_bytes);
        Self::new(r, s).map_err(|e| PrimitivesError::InvalidDer(e.to_string()))
    }

    /// Serialize the signature as minimal DER.
    ///
    /// The encoding is lossless: `s` is written as-is, high or low. The
    /// output is at most [`EC_SIGNATURE_DER_MAX_LEN`] bytes.
    pub fn to_der(&self) -> Vec<u8> {
        let rb = canonicalize_int(&self.r);
        let sb = canonicalize_int(&self.s);

        let total_len = 6 + rb.len() + sb.len();
        let mut out = Vec::with_capacity(total_len);
        out.push(DER_SEQUENCE);
        out.push((total_len - 2) as u8);
        out.push(DER_INTEGER);
        out.push(rb.len() as u8);
        out.extend_from_slice(&rb);
        out.push(DER_INTEGER);
        out.push(sb.len() as u8);
        out.extend_from_slice(&sb);
        out
    }
}

/// Read one minimally encoded, non-negative DER INTEGER from the front of
/// `data`, returning its value bytes and the remainder.
fn read_integer<'a>(data: &'a [u8], name: &str) -> Result<(&'a [u8], &'a [u8]), PrimitivesError> {
    if data.len() < 2 || data[0] != DER_INTEGER {
        return Err(PrimitivesError::InvalidDer(format!(
            "no integer marker for {}",
            name
        )));
    }
    let len = data[1] as usize;
    // Short-form lengths only; anything at or above 0x80 cannot fit a scalar.
    if len == 0 || len > 33 || 2 + len > data.len() {
        return Err(PrimitivesError::InvalidDer(format!(
            "bogus {} length {}",
            name, len
        )));
    }
    let value = &data[2..2 + len];
    if value[0] & 0x80 != 0 {
        return Err(PrimitivesError::InvalidDer(format!("{} is negative", name)));
    }
    if len > 1 && value[0] == 0x00 && value[1] & 0x80 == 0 {
        return Err(PrimitivesError::InvalidDer(format!(
            "{} has excessive padding",
            name
        )));
    }
    if len == 33 && value[0] != 0x00 {
        return Err(PrimitivesError::InvalidDer(format!(
            "{} is wider than 32 bytes",
            name
        )));
    }
    Ok((value, &data[2 + len..]))
}

fn check_scalar(name: &str, val: &[u8; 32]) -> Result<(), PrimitivesError> {
    if is_zero(val) {
        return Err(PrimitivesError::InvalidSignature(format!(
            "signature {} is zero",
            name
        )));
    }
    if !is_less_than(val, &CURVE_ORDER) {
        return Err(PrimitivesError::InvalidSignature(format!(
            "signature {} is >= curve.N",
            name
        )));
    }
    Ok(())
}

/// Encode a 32-byte big-endian integer as DER INTEGER content.
///
/// Strips leading zeros and adds a 0x00 padding byte if the high bit is set.
fn canonicalize_int(val: &[u8; 32]) -> Vec<u8> {
    let mut start = 0;
    while start < 31 && val[start] == 0 {
        start += 1;
    }
    let trimmed = &val[start..];

    if trimmed[0] & 0x80 != 0 {
        let mut out = Vec::with_capacity(trimmed.len() + 1);
        out.push(0x00);
        out.extend_from_slice(trimmed);
        out
    } else {
        trimmed.to_vec()
    }
}

/// Left-pad validated DER INTEGER content (at most 32 significant bytes) to
/// 32 bytes.
fn to_32_bytes(bytes: &[u8]) -> [u8; 32] {
    let trimmed = if bytes.len() == 33 { &bytes[1..] } else { bytes };
    let mut out = [0u8; 32];
    out[32 - trimmed.len()..].copy_from_slice(trimmed);
    out
}

/// Check if a 32-byte big-endian integer is zero.
fn is_zero(val: &[u8; 32]) -> bool {
    val.iter().all(|&b| b == 0)
}

/// Compare two 32-byte big-endian integers: a < b.
fn is_less_than(a: &[u8; 32], b: &[u8; 32]) -> bool {
    for i in 0..32 {
        if a[i] < b[i] {
            return true;
        }
        if a[i] > b[i] {
            return false;
        }
    }
    false
}

/// Compare two 32-byte big-endian integers: a > b.
fn is_greater_than(a: &[u8; 32], b: &[u8; 32]) -> bool {
    is_less_than(b, a)
}

/// Compute N - val where N is the secp256k1 curve order.
fn subtract_from_order(val: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;
    for i in (0..32).rev() {
        let diff = CURVE_ORDER[i] as i32 - val[i] as i32 - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }
    result
}
