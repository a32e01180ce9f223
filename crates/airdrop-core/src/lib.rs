#![deny(missing_docs)]

//! # airdrop-core — Foundational Types for the Merkle Airdrop
//!
//! This crate defines the value types every other crate in the workspace
//! depends on. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** [`Address`], [`Hash32`] and
//!    [`ContextId`] are distinct types. A recipient can never be passed where
//!    a digest is expected.
//!
//! 2. **One leaf derivation.** Both the tree builder and the claim engine
//!    compute leaves through [`WhitelistEntry::leaf`], which packs
//!    `(recipient, allocation, context)` with [`PackedEncoder`] and hashes the
//!    result. There is no second code path that could drift.
//!
//! 3. **Context binding.** The context identifier is part of every leaf, so a
//!    proof issued for one chain never verifies on another.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `airdrop-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod address;
pub mod digest;
pub mod entry;
pub mod error;
pub mod packed;

pub use address::Address;
pub use digest::{DigestAlgorithm, Hash32};
pub use entry::{ContextId, WhitelistEntry};
pub use error::CoreError;
pub use packed::PackedEncoder;
