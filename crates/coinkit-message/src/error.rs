use coinkit_primitives::{ErrorKind, PrimitivesError};

/// Error types for message operations.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The message exceeds [`crate::BITCOIN_MESSAGE_MAX_LEN`].
    #[error("message too long: maximum {max} bytes, got {got}")]
    MessageTooLong {
        /// Largest accepted message length.
        max: usize,
        /// Length of the rejected message.
        got: usize,
    },
    /// Unknown bits were set in a numeric flags value.
    #[error("invalid message flags: {0:#x}")]
    InvalidFlags(u32),
    /// An error raised by the underlying primitives.
    #[error("{0}")]
    Primitives(#[from] PrimitivesError),
}

impl MessageError {
    /// Classify this error the same way [`PrimitivesError::kind`] does.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MessageError::Primitives(e) => e.kind(),
            _ => ErrorKind::InvalidArgument,
        }
    }
}
