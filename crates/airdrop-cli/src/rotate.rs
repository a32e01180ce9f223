//! # Root Rotation Check
//!
//! Claimed status survives a root update. Before publishing a new root, run
//! this against the current whitelist, the replacement and the indices
//! already claimed; any reported index would be permanently blocked for its
//! new recipient.
//!
//! ```bash
//! airdrop rotate-check --previous v1.json --next v2.json --context-id 1 --claimed 0,3,7
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use airdrop_tree::rotation_conflicts;

use crate::config::{DistributionConfig, TreeParams};
use crate::whitelist::{build_from_file, write_json};

/// Arguments for `airdrop rotate-check`.
#[derive(Args, Debug)]
pub struct RotateCheckArgs {
    /// Whitelist behind the currently published root.
    #[arg(long)]
    pub previous: PathBuf,

    /// Replacement whitelist.
    #[arg(long)]
    pub next: PathBuf,

    #[command(flatten)]
    pub params: TreeParams,

    /// Claimed or reserved indices (`Distributor::blocked_indices`), comma separated.
    #[arg(long, value_delimiter = ',')]
    pub claimed: Vec<u64>,

    /// JSON file holding an array of claimed indices.
    #[arg(long)]
    pub claimed_file: Option<PathBuf>,

    /// Print conflicts as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute `airdrop rotate-check`. Exit code 1 if any index is blocked.
pub fn run_rotate_check(args: &RotateCheckArgs, config: &DistributionConfig) -> Result<u8> {
    let (context, algorithm) = args.params.resolve(config)?;
    let previous = build_from_file(&args.previous, context, algorithm)?;
    let next = build_from_file(&args.next, context, algorithm)?;

    let mut claimed = args.claimed.clone();
    if let Some(path) = &args.claimed_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read claimed indices: {}", path.display()))?;
        let from_file: Vec<u64> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse claimed indices: {}", path.display()))?;
        claimed.extend(from_file);
    }

    let conflicts = rotation_conflicts(&previous, &next, claimed);

    if args.json {
        write_json(&conflicts, None)?;
    } else {
        println!("  previous root: {}", previous.root());
        println!("  next root:     {}", next.root());
        for conflict in &conflicts {
            let was = conflict
                .previous
                .as_ref()
                .map(|e| format!("{} ({})", e.recipient, e.allocation))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  BLOCKED index {}: was {was}, next {} ({})",
                conflict.index, conflict.next.recipient, conflict.next.allocation
            );
        }
        if conflicts.is_empty() {
            println!("  OK: no claimed index changes owner");
        }
    }

    if conflicts.is_empty() {
        Ok(0)
    } else {
        tracing::warn!(blocked = conflicts.len(), "rotation would block claimed indices");
        Ok(1)
    }
}
