//! # airdrop-tree — Whitelist Merkle Tree Builder
//!
//! Builds the commitment that the claim engine verifies against. The builder
//! is pure and stateless: the same whitelist, context and algorithm always
//! yield the same root and the same proof for every index, so proofs handed
//! out off-chain stay valid against the published root.
//!
//! ## Tree Shape
//!
//! - Leaf `i` is `entries[i].leaf(context, algorithm)`. Leaves keep input
//!   order; the input position is the claim index.
//! - Node = `H(left || right)` in positional order.
//! - A level with an odd node count is padded with [`Hash32::ZERO`] as the
//!   right sibling of its last node.
//! - Every proof has exactly [`MerkleTree::depth`] siblings and the direction
//!   at level `k` is bit `k` of the index.
//!
//! Verification ([`verify_proof`]) needs only the root, the leaf, the index
//! and the siblings. It never sees the whitelist.
//!
//! [`Hash32::ZERO`]: airdrop_core::Hash32::ZERO

pub mod error;
pub mod export;
pub mod proof;
pub mod rotation;
pub mod tree;

pub use error::TreeError;
pub use export::{ClaimPayload, TreeExport};
pub use proof::{compute_root, verify_proof, Proof};
pub use rotation::{rotation_conflicts, RotationConflict};
pub use tree::MerkleTree;
