//! # Inclusion Proofs
//!
//! A [`Proof`] is the ordered list of sibling hashes from a leaf up to the
//! root, plus the leaf index. The index supplies the direction at every
//! level, so no per-level side flags are stored.
//!
//! ## Security Invariant
//!
//! [`compute_root`] rejects an index with bits set above the proof length.
//! Together with zero padding (every level of a tree has a real or zero
//! sibling) this binds each proof to exactly one index: a leaf cannot be
//! replayed at a second position of the same tree.

use serde::{Deserialize, Serialize};

use airdrop_core::{DigestAlgorithm, Hash32};

/// A sibling path for one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Position of the leaf in the whitelist.
    pub index: u64,
    /// Sibling hashes, leaf level first.
    pub siblings: Vec<Hash32>,
}

impl Proof {
    /// Create a proof.
    pub fn new(index: u64, siblings: Vec<Hash32>) -> Self {
        Self { index, siblings }
    }

    /// Number of levels the proof climbs.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Root implied by this proof for `leaf`, or `None` if the index does
    /// not fit the proof length.
    pub fn compute_root(&self, algorithm: DigestAlgorithm, leaf: Hash32) -> Option<Hash32> {
        compute_root(algorithm, leaf, self.index, &self.siblings)
    }
}

/// Re-derive the root implied by `leaf` at `index` with `siblings`.
///
/// Returns `None` when `index >= 2^siblings.len()`.
pub fn compute_root(
    algorithm: DigestAlgorithm,
    leaf: Hash32,
    index: u64,
    siblings: &[Hash32],
) -> Option<Hash32> {
    if siblings.len() < 64 && index >> siblings.len() != 0 {
        return None;
    }
    let mut current = leaf;
    for (level, sibling) in siblings.iter().enumerate() {
        let is_right = level < 64 && (index >> level) & 1 == 1;
        current = if is_right {
            algorithm.hash_pair(sibling, &current)
        } else {
            algorithm.hash_pair(&current, sibling)
        };
    }
    Some(current)
}

/// Check that `proof` places `leaf` under `root`.
pub fn verify_proof(algorithm: DigestAlgorithm, root: &Hash32, leaf: &Hash32, proof: &Proof) -> bool {
    proof.compute_root(algorithm, *leaf) == Some(*root)
}
