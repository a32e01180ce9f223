//! # Distributor Configuration

use serde::{Deserialize, Serialize};

use airdrop_core::{Address, ContextId, DigestAlgorithm};

/// Fixed parameters of one distribution.
///
/// `context_id` and `algorithm` must match the values the tree was built
/// with, or every proof fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributorConfig {
    /// The only address allowed to publish roots.
    pub controller: Address,
    /// Context bound into every leaf this engine recomputes.
    pub context_id: ContextId,
    /// Leaf and node hash.
    #[serde(default)]
    pub algorithm: DigestAlgorithm,
}

impl DistributorConfig {
    /// Keccak-256 configuration for `controller` on `context_id`.
    pub fn new(controller: Address, context_id: ContextId) -> Self {
        Self {
            controller,
            context_id,
            algorithm: DigestAlgorithm::default(),
        }
    }

    /// Override the hash algorithm.
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}
