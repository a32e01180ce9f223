//! # Claim Engine Errors
//!
//! Every variant is a deterministic rejection. No state changed by the
//! rejected call survives it, so a caller may retry only with different
//! input.

use airdrop_core::Address;
use thiserror::Error;

/// Errors from [`Distributor`](crate::Distributor) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    /// The root derived from the entry, index and proof is not the current root.
    #[error("proof for index {index} does not match the current root")]
    InvalidProof {
        /// The claimed index.
        index: u64,
    },

    /// The index was already claimed, or a claim for it is in flight.
    #[error("index {index} has already been claimed")]
    AlreadyClaimed {
        /// The claimed index.
        index: u64,
    },

    /// The pool cannot cover the allocation.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// The allocation being claimed.
        requested: u128,
        /// The balance at the time of the check.
        available: u128,
    },

    /// Only the controller may publish a root.
    #[error("caller {caller} is not the distribution controller")]
    PermissionDenied {
        /// The rejected caller.
        caller: Address,
    },

    /// No root has been published yet.
    #[error("no merkle root has been published")]
    RootNotSet,

    /// The zero hash cannot be a root.
    #[error("the zero hash is not a valid merkle root")]
    InvalidRoot,

    /// The external transfer failed; the claim was rolled back.
    #[error("transfer for index {index} failed: {reason}")]
    TransferFailed {
        /// The claimed index.
        index: u64,
        /// Reason reported by the transfer backend.
        reason: String,
    },

    /// A balance or total would overflow.
    #[error("arithmetic overflow in balance accounting")]
    ArithmeticOverflow,
}
