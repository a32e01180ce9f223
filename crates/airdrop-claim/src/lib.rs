//! # airdrop-claim — Merkle Airdrop Claim Engine
//!
//! An explicitly owned [`Distributor`] holds the accepted root, the pool
//! balance and the per-index claim record. It depends on the tree crate only
//! for the proof format and the verification function. It never sees the
//! whitelist.
//!
//! ## Concurrency
//!
//! All checks and the reservation of an index happen under one
//! `parking_lot::Mutex`. The external transfer runs with the lock released,
//! after the index is reserved, and is followed by a commit or a rollback
//! under the lock. Concurrent claims for the same index therefore resolve to
//! one success and `AlreadyClaimed` for every other caller.

pub mod config;
pub mod distributor;
pub mod error;
pub mod event;
pub mod transfer;

pub use config::DistributorConfig;
pub use distributor::{ClaimStatus, Distributor};
pub use error::ClaimError;
pub use event::{DistributorEvent, EventKind};
pub use transfer::{InMemoryLedger, NativeTransfer, TransferError};
