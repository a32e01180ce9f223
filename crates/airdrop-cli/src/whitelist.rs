//! # Whitelist and Output Files
//!
//! A whitelist is a JSON or YAML list of `{recipient, allocation}` objects.
//! The list order is the claim index order.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use airdrop_core::{ContextId, DigestAlgorithm, WhitelistEntry};
use airdrop_tree::MerkleTree;

use crate::config::is_json;

/// Read a whitelist file.
pub fn load_whitelist(path: &Path) -> Result<Vec<WhitelistEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read whitelist: {}", path.display()))?;
    let entries: Vec<WhitelistEntry> = if is_json(path) {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON whitelist: {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML whitelist: {}", path.display()))?
    };
    tracing::debug!(path = %path.display(), entries = entries.len(), "loaded whitelist");
    Ok(entries)
}

/// Read a whitelist and build its tree.
pub fn build_from_file(
    path: &Path,
    context: ContextId,
    algorithm: DigestAlgorithm,
) -> Result<MerkleTree> {
    let entries = load_whitelist(path)?;
    MerkleTree::build(entries, context, algorithm)
        .with_context(|| format!("failed to build tree from {}", path.display()))
}

/// Pretty JSON to `out`, or to stdout when `out` is `None`.
pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory: {}", parent.display()))?;
            }
            std::fs::write(path, json + "\n")
                .with_context(|| format!("failed to write output: {}", path.display()))?;
        }
        None => println!("{json}"),
    }
    Ok(())
}
