//! # Core Error Types
//!
//! Parse and validation failures for the primitives in `airdrop-core`.
//! Errors carry the rejected input so operators can fix whitelist files
//! without guesswork.

use thiserror::Error;

/// Errors raised while parsing or validating core primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Address is not 40 hex characters (with or without `0x`).
    #[error("invalid address \"{value}\": {reason}")]
    InvalidAddress {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The all-zero address cannot receive an allocation.
    #[error("zero address is not a valid recipient")]
    ZeroAddress,

    /// Digest is not 64 hex characters (with or without `0x`).
    #[error("invalid 32-byte hash \"{value}\": {reason}")]
    InvalidHash {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Hash algorithm name is not recognised.
    #[error("unknown digest algorithm \"{0}\" (expected keccak256 or sha256)")]
    UnknownAlgorithm(String),

    /// Allocation string is not a non-negative decimal integer.
    #[error("invalid allocation \"{0}\": expected a decimal integer that fits in 128 bits")]
    InvalidAllocation(String),
}
