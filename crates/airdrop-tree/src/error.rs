//! # Tree Builder Errors

use thiserror::Error;

/// Errors from building or querying a [`MerkleTree`](crate::MerkleTree).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The whitelist has no entries.
    #[error("cannot build a merkle tree from an empty whitelist")]
    EmptyInput,

    /// The requested index is not a leaf of this tree.
    #[error("index {index} is out of range for a tree with {len} leaves")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of leaves in the tree.
        len: usize,
    },

    /// The sum of all allocations does not fit in 128 bits.
    #[error("total allocation overflows 128 bits")]
    AllocationOverflow,
}
