#![deny(missing_docs)]

//! Coinkit - Bitcoin wallet cryptography toolkit.
//!
//! Re-exports all coinkit components for convenient single-crate usage.

pub use coinkit_primitives as primitives;
pub use coinkit_message as message;
