//! # airdrop-cli — Off-chain Airdrop Tooling
//!
//! Builds the tree from a whitelist file and produces what operators and
//! recipients need: the root to publish, per-index claim payloads, export
//! verification, and a pre-rotation check against already-claimed indices.
//!
//! ## Subcommands
//!
//! - `build-tree`: root and full claim export for a whitelist
//! - `proof`: the claim payload for one index
//! - `verify`: re-check every payload of an export against its root
//! - `rotate-check`: list claimed indices a new whitelist would block
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; tree logic lives in `airdrop-tree`.
//! - Handlers return `anyhow::Result<u8>`; the `u8` is the process exit code.

pub mod build;
pub mod config;
pub mod rotate;
pub mod verify;
pub mod whitelist;
