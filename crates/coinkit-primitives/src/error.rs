/// Unified error type for all primitives operations.
///
/// Covers input validation failures from every engine plus the internal
/// (resource) failures scrypt can hit. Signature verification mismatches are
/// not errors: verifiers return `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid {what} length: expected {expected}, got {got}")]
    InvalidLength {
        what: &'static str,
        expected: String,
        got: usize,
    },

    #[error("invalid flags: {0}")]
    InvalidFlags(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("malformed DER signature: {0}")]
    InvalidDer(String),

    #[error("decryption error: {0}")]
    DecryptionError(String),

    #[error("allocation failed: {0}")]
    AllocationFailed(String),
}

/// Broad classification of a [`PrimitivesError`].
///
/// Callers treat `InvalidArgument` as a programming error on their side and
/// `Internal` as an environment failure (e.g. memory exhaustion).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Internal,
}

impl PrimitivesError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PrimitivesError::AllocationFailed(_) => ErrorKind::Internal,
            _ => ErrorKind::InvalidArgument,
        }
    }

    /// Shorthand for a length error with a single expected value.
    pub(crate) fn length(what: &'static str, expected: usize, got: usize) -> Self {
        PrimitivesError::InvalidLength {
            what,
            expected: expected.to_string(),
            got,
        }
    }
}
