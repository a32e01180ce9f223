//! # Merkle Tree Construction
//!
//! Level-by-level reduction over the whitelist leaves. Every level is kept,
//! so the sibling of any node is a direct lookup (`level[pos ^ 1]`, or the
//! zero hash past the end of an odd level). Construction is an explicit loop;
//! memory is `O(n)` and stack use is constant for any whitelist size.

use std::collections::BTreeMap;

use airdrop_core::{ContextId, DigestAlgorithm, Hash32, WhitelistEntry};

use crate::error::TreeError;
use crate::export::{ClaimPayload, TreeExport};
use crate::proof::Proof;

/// A built tree over one whitelist snapshot.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    entries: Vec<WhitelistEntry>,
    context: ContextId,
    algorithm: DigestAlgorithm,
    /// `levels[0]` holds the leaves; the last level holds the root alone.
    levels: Vec<Vec<Hash32>>,
}

impl MerkleTree {
    /// Build the tree for `entries` bound to `context`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyInput`] if `entries` is empty.
    pub fn build(
        entries: Vec<WhitelistEntry>,
        context: ContextId,
        algorithm: DigestAlgorithm,
    ) -> Result<Self, TreeError> {
        if entries.is_empty() {
            return Err(TreeError::EmptyInput);
        }

        let leaves: Vec<Hash32> = entries
            .iter()
            .map(|entry| entry.leaf(context, algorithm))
            .collect();

        let mut levels = vec![leaves];
        while let Some(level) = levels.last() {
            if level.len() <= 1 {
                break;
            }
            let next: Vec<Hash32> = level
                .chunks(2)
                .map(|pair| {
                    let right = pair.get(1).unwrap_or(&Hash32::ZERO);
                    algorithm.hash_pair(&pair[0], right)
                })
                .collect();
            levels.push(next);
        }

        let tree = Self {
            entries,
            context,
            algorithm,
            levels,
        };
        tracing::debug!(
            leaves = tree.len(),
            depth = tree.depth(),
            context = %context,
            algorithm = %algorithm,
            root = %tree.root(),
            "built merkle tree"
        );
        Ok(tree)
    }

    /// The root commitment.
    pub fn root(&self) -> Hash32 {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(Hash32::ZERO)
    }

    /// The root as `0x`-prefixed hex.
    pub fn root_hex(&self) -> String {
        self.root().to_hex()
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of levels above the leaves; also the length of every proof.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Context the leaves are bound to.
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Hash algorithm for leaves and nodes.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// The whitelist in index order.
    pub fn entries(&self) -> &[WhitelistEntry] {
        &self.entries
    }

    /// The raw entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::IndexOutOfRange`] for an index past the end.
    pub fn item(&self, index: usize) -> Result<&WhitelistEntry, TreeError> {
        self.entries.get(index).ok_or(TreeError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// The leaf hash at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::IndexOutOfRange`] for an index past the end.
    pub fn leaf(&self, index: usize) -> Result<Hash32, TreeError> {
        self.levels[0]
            .get(index)
            .copied()
            .ok_or(TreeError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// The inclusion proof for `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::IndexOutOfRange`] for an index past the end.
    pub fn proof(&self, index: usize) -> Result<Proof, TreeError> {
        if index >= self.len() {
            return Err(TreeError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        let mut siblings = Vec::with_capacity(self.depth());
        let mut pos = index;
        for level in &self.levels[..self.depth()] {
            let sibling = level.get(pos ^ 1).copied().unwrap_or(Hash32::ZERO);
            siblings.push(sibling);
            pos /= 2;
        }
        Ok(Proof::new(index as u64, siblings))
    }

    /// Sum of all allocations: the balance needed to fund every claim.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::AllocationOverflow`] if the sum exceeds `u128`.
    pub fn total_allocation(&self) -> Result<u128, TreeError> {
        self.entries.iter().try_fold(0u128, |acc, entry| {
            acc.checked_add(entry.allocation)
                .ok_or(TreeError::AllocationOverflow)
        })
    }

    /// Groups of indices whose leaves are identical, in first-index order.
    ///
    /// Identical leaves are separate claims (one per index); this report lets
    /// an operator decide whether a repeated entry was intended.
    pub fn duplicate_leaves(&self) -> Vec<Vec<usize>> {
        let mut by_leaf: BTreeMap<Hash32, Vec<usize>> = BTreeMap::new();
        for (index, leaf) in self.levels[0].iter().enumerate() {
            by_leaf.entry(*leaf).or_default().push(index);
        }
        let mut groups: Vec<Vec<usize>> = by_leaf
            .into_values()
            .filter(|indices| indices.len() > 1)
            .collect();
        groups.sort_by_key(|indices| indices[0]);
        groups
    }

    /// Full claim payload set for off-chain distribution.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::AllocationOverflow`] if the total allocation
    /// cannot be represented.
    pub fn export(&self) -> Result<TreeExport, TreeError> {
        let claims = (0..self.len())
            .map(|index| {
                let proof = self.proof(index)?;
                Ok(ClaimPayload {
                    index: proof.index,
                    recipient: self.entries[index].recipient,
                    allocation: self.entries[index].allocation,
                    leaf: self.levels[0][index],
                    proof: proof.siblings,
                })
            })
            .collect::<Result<Vec<_>, TreeError>>()?;

        Ok(TreeExport {
            root: self.root(),
            context_id: self.context,
            algorithm: self.algorithm,
            leaf_count: self.len(),
            depth: self.depth(),
            total_allocation: self.total_allocation()?,
            claims,
        })
    }
}
