//! # Tree Building Commands
//!
//! ```bash
//! # Root and every claim payload:
//! airdrop build-tree --whitelist whitelist.json --context-id 1 --out dist/tree.json
//!
//! # One recipient's payload:
//! airdrop proof --whitelist whitelist.json --context-id 1 --index 0
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use airdrop_core::{ContextId, DigestAlgorithm, Hash32};
use airdrop_tree::ClaimPayload;

use crate::config::{DistributionConfig, TreeParams};
use crate::whitelist::{build_from_file, write_json};

/// Arguments for `airdrop build-tree`.
#[derive(Args, Debug)]
pub struct BuildTreeArgs {
    /// Whitelist file (JSON or YAML).
    #[arg(long)]
    pub whitelist: PathBuf,

    #[command(flatten)]
    pub params: TreeParams,

    /// Write the export here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for `airdrop proof`.
#[derive(Args, Debug)]
pub struct ProofArgs {
    /// Whitelist file (JSON or YAML).
    #[arg(long)]
    pub whitelist: PathBuf,

    #[command(flatten)]
    pub params: TreeParams,

    /// Leaf index to prove.
    #[arg(long)]
    pub index: usize,

    /// Write the payload here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// A single claim payload together with what it verifies against.
#[derive(Debug, Serialize)]
pub struct ProofOutput {
    /// Root the proof verifies against.
    pub root: Hash32,
    /// Context the leaf is bound to.
    pub context_id: ContextId,
    /// Leaf and node hash.
    pub algorithm: DigestAlgorithm,
    /// The payload.
    pub claim: ClaimPayload,
}

/// Execute `airdrop build-tree`.
pub fn run_build_tree(args: &BuildTreeArgs, config: &DistributionConfig) -> Result<u8> {
    let (context, algorithm) = args.params.resolve(config)?;
    let tree = build_from_file(&args.whitelist, context, algorithm)?;

    for group in tree.duplicate_leaves() {
        tracing::warn!(indices = ?group, "identical whitelist entries; each index is a separate claim");
    }

    let export = tree.export().context("failed to export tree")?;
    write_json(&export, args.out.as_deref())?;

    if let Some(out) = &args.out {
        println!("  root:             {}", export.root);
        println!("  leaves:           {}", export.leaf_count);
        println!("  depth:            {}", export.depth);
        println!("  total allocation: {}", export.total_allocation);
        println!("  written:          {}", out.display());
    }
    Ok(0)
}

/// Execute `airdrop proof`.
pub fn run_proof(args: &ProofArgs, config: &DistributionConfig) -> Result<u8> {
    let (context, algorithm) = args.params.resolve(config)?;
    let tree = build_from_file(&args.whitelist, context, algorithm)?;

    let entry = tree.item(args.index)?;
    let proof = tree.proof(args.index)?;
    let output = ProofOutput {
        root: tree.root(),
        context_id: context,
        algorithm,
        claim: ClaimPayload {
            index: proof.index,
            recipient: entry.recipient,
            allocation: entry.allocation,
            leaf: tree.leaf(args.index)?,
            proof: proof.siblings,
        },
    };
    write_json(&output, args.out.as_deref())?;
    Ok(0)
}
