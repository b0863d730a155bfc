#![deny(missing_docs)]

//! Coinkit - Bitcoin signed-message formatting and signing.
//!
//! Builds the canonical "Bitcoin Signed Message" preimage whose double
//! SHA-256 is the digest wallets sign for off-chain message authentication,
//! and signs/verifies messages with the coinkit EC engine.

mod error;
pub mod format;
pub mod signed;

pub use error::MessageError;
pub use format::{
    bitcoin_message_hash, format_bitcoin_message, MessageFlags, BITCOIN_MESSAGE_FLAG_HASH,
    BITCOIN_MESSAGE_MAX_LEN,
};
pub use signed::{sign_message, verify_message};
