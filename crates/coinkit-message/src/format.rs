//! Bitcoin signed-message preimage.
//!
//! The preimage is `varint(24) || "Bitcoin Signed Message:\n" ||
//! varint(len) || message`; its double SHA-256 is the digest that gets signed.

use std::ops::{BitOr, BitOrAssign};

use coinkit_primitives::hash::sha256d;
use coinkit_primitives::util::VarInt;
use coinkit_primitives::SHA256_LEN;

use crate::MessageError;

/// Magic string prepended to every signed message.
const MESSAGE_MAGIC: &[u8] = b"Bitcoin Signed Message:\n";

/// Largest message accepted by [`format_bitcoin_message`].
pub const BITCOIN_MESSAGE_MAX_LEN: usize = 64 * 1024 - 64;

/// Numeric flag asking [`format_bitcoin_message`] for the digest instead of
/// the preimage.
pub const BITCOIN_MESSAGE_FLAG_HASH: u32 = 0x1;

/// Message formatting flags (bitmask).
///
/// Values outside the known bits can only be rejected by
/// [`MessageFlags::from_flags`]; there is no other way to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageFlags(u32);

impl MessageFlags {
    /// Return the preimage itself.
    pub const NONE: MessageFlags = MessageFlags(0);
    /// Return the double SHA-256 of the preimage.
    pub const HASH: MessageFlags = MessageFlags(BITCOIN_MESSAGE_FLAG_HASH);

    const ALL: u32 = BITCOIN_MESSAGE_FLAG_HASH;

    /// Convert a numeric flags value, rejecting unknown bits.
    pub fn from_flags(flags: u32) -> Result<Self, MessageError> {
        if flags & !Self::ALL != 0 {
            return Err(MessageError::InvalidFlags(flags));
        }
        Ok(MessageFlags(flags))
    }

    /// The numeric flags value.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `flag` is set.
    pub fn has_flag(self, flag: MessageFlags) -> bool {
        self.0 & flag.0 == flag.0
    }
}

impl BitOr for MessageFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        MessageFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for MessageFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Build the signed-message preimage for `message`.
///
/// With [`MessageFlags::HASH`] set, the 32-byte double SHA-256 of the
/// preimage is returned instead.
///
/// # Returns
/// The preimage or digest, or `MessageTooLong` if `message` exceeds
/// [`BITCOIN_MESSAGE_MAX_LEN`].
pub fn format_bitcoin_message(
    message: &[u8],
    flags: MessageFlags,
) -> Result<Vec<u8>, MessageError> {
    let preimage = preimage(message)?;
    if flags.has_flag(MessageFlags::HASH) {
        Ok(sha256d(&preimage).to_vec())
    } else {
        Ok(preimage)
    }
}

/// The double SHA-256 of the signed-message preimage of `message`.
pub fn bitcoin_message_hash(message: &[u8]) -> Result<[u8; SHA256_LEN], MessageError> {
    Ok(sha256d(&preimage(message)?))
}

fn preimage(message: &[u8]) -> Result<Vec<u8>, MessageError> {
    if message.len() > BITCOIN_MESSAGE_MAX_LEN {
        return Err(MessageError::MessageTooLong {
            max: BITCOIN_MESSAGE_MAX_LEN,
            got: message.len(),
        });
    }
    let magic_len = VarInt::from(MESSAGE_MAGIC.len());
    let msg_len = VarInt::from(message.len());

    let mut out =
        Vec::with_capacity(magic_len.length() + MESSAGE_MAGIC.len() + msg_len.length() + message.len());
    out.extend_from_slice(&magic_len.to_bytes());
    out.extend_from_slice(MESSAGE_MAGIC);
    out.extend_from_slice(&msg_len.to_bytes());
    out.extend_from_slice(message);
    Ok(out)
}
