//! Bitcoin variable-length integer encoding.
//!
//! Used by the message formatter to length-prefix the preamble and payload.

use crate::PrimitivesError;

/// A Bitcoin protocol variable-length integer.
///
/// Values below 0xfd take one byte; larger values take a marker byte
/// (0xfd, 0xfe, 0xff) followed by a little-endian u16, u32 or u64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Decode a VarInt from the front of a byte slice.
    ///
    /// # Returns
    /// The decoded value and the number of bytes consumed, or an error if the
    /// slice is shorter than the encoding its marker byte announces.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), PrimitivesError> {
        let marker = *data.first().ok_or_else(|| {
            PrimitivesError::InvalidParameter("varint: empty input".to_string())
        })?;
        let size = match marker {
            0xff => 9,
            0xfe => 5,
            0xfd => 3,
            b => return Ok((VarInt(b as u64), 1)),
        };
        if data.len() < size {
            return Err(PrimitivesError::InvalidLength {
                what: "varint",
                expected: format!("at least {}", size),
                got: data.len(),
            });
        }
        let mut le = [0u8; 8];
        le[..size - 1].copy_from_slice(&data[1..size]);
        Ok((VarInt(u64::from_le_bytes(le)), size))
    }

    /// Return the wire-format byte length of this VarInt: 1, 3, 5 or 9.
    pub fn length(&self) -> usize {
        if self.0 < 0xfd {
            1
        } else if self.0 <= u16::MAX as u64 {
            3
        } else if self.0 <= u32::MAX as u64 {
            5
        } else {
            9
        }
    }

    /// Encode the VarInt into a new byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let v = self.0;
        let mut buf = Vec::with_capacity(self.length());
        match self.length() {
            1 => buf.push(v as u8),
            3 => {
                buf.push(0xfd);
                buf.extend_from_slice(&(v as u16).to_le_bytes());
            }
            5 => {
                buf.push(0xfe);
                buf.extend_from_slice(&(v as u32).to_le_bytes());
            }
            _ => {
                buf.push(0xff);
                buf.extend_from_slice(&v.to_le_bytes());
            }
        }
        buf
    }

    /// Return the underlying u64 value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        VarInt(v)
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}
