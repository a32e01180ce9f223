//! # Root Rotation Analysis
//!
//! Claimed status in the engine is keyed by leaf index and is not reset when
//! the root changes. After a rotation, an index that was claimed under the
//! previous tree stays claimed. If the new tree puts a different leaf at that
//! index, its recipient can never claim.
//!
//! [`rotation_conflicts`] lists those indices before the new root is
//! published. The usual remedy is to move the affected entries to fresh
//! indices at the end of the new whitelist.

use serde::{Deserialize, Serialize};

use airdrop_core::WhitelistEntry;

use crate::tree::MerkleTree;

/// An index claimed under the previous tree whose leaf changes in the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationConflict {
    /// The claimed index.
    pub index: u64,
    /// The entry that was claimed at this index, if the previous tree had one.
    pub previous: Option<WhitelistEntry>,
    /// The entry the next tree assigns to this index.
    pub next: WhitelistEntry,
}

/// Indices in `claimed` whose leaf in `next` differs from `previous`.
///
/// Claimed indices past the end of `next` are ignored: nobody can be blocked
/// at an index that has no leaf. A context or algorithm change makes every
/// leaf differ, so every claimed index inside `next` is reported.
pub fn rotation_conflicts<I>(
    previous: &MerkleTree,
    next: &MerkleTree,
    claimed: I,
) -> Vec<RotationConflict>
where
    I: IntoIterator<Item = u64>,
{
    let mut indices: Vec<u64> = claimed.into_iter().collect();
    indices.sort_unstable();
    indices.dedup();

    indices
        .into_iter()
        .filter_map(|index| {
            let i = usize::try_from(index).ok()?;
            let next_leaf = next.leaf(i).ok()?;
            if previous.leaf(i).ok() == Some(next_leaf) {
                return None;
            }
            Some(RotationConflict {
                index,
                previous: previous.item(i).ok().cloned(),
                next: next.item(i).ok()?.clone(),
            })
        })
        .collect()
}
