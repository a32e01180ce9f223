//! # Distribution Configuration
//!
//! Optional `--config` file (YAML or JSON) holding the context identifier
//! and hash algorithm. Command-line flags override the file.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use airdrop_core::{ContextId, DigestAlgorithm};

/// Values a configuration file may provide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistributionConfig {
    /// Chain identifier bound into every leaf.
    #[serde(default)]
    pub context_id: Option<ContextId>,
    /// Leaf and node hash.
    #[serde(default)]
    pub algorithm: Option<DigestAlgorithm>,
}

impl DistributionConfig {
    /// Load from `path`; the format follows the extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse JSON config: {}", path.display()))
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("failed to parse YAML config: {}", path.display()))
        }
    }
}

/// Flags shared by every command that builds a tree.
#[derive(Args, Debug, Clone, Default)]
pub struct TreeParams {
    /// Chain identifier bound into every leaf.
    #[arg(long)]
    pub context_id: Option<u64>,

    /// Hash algorithm (keccak256 or sha256).
    #[arg(long)]
    pub algorithm: Option<DigestAlgorithm>,
}

impl TreeParams {
    /// Resolve against `config`: flags first, then the file.
    ///
    /// The context identifier has no default. The algorithm defaults to
    /// Keccak-256.
    pub fn resolve(&self, config: &DistributionConfig) -> Result<(ContextId, DigestAlgorithm)> {
        let context = self
            .context_id
            .map(ContextId)
            .or(config.context_id)
            .context("a context id is required (--context-id or `context_id` in --config)")?;
        let algorithm = self.algorithm.or(config.algorithm).unwrap_or_default();
        tracing::debug!(context = %context, algorithm = %algorithm, "resolved tree parameters");
        Ok((context, algorithm))
    }
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
