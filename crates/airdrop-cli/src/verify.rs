//! # Export Verification
//!
//! Re-derives every leaf of a claim export from its entry and checks its
//! proof against the export root, optionally also against the root that was
//! actually published.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use airdrop_core::Hash32;
use airdrop_tree::TreeExport;

/// Arguments for `airdrop verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Export produced by `airdrop build-tree`.
    #[arg(long)]
    pub export: PathBuf,

    /// Root that must match the export root (e.g. the published one).
    #[arg(long)]
    pub root: Option<Hash32>,
}

/// Outcome of checking one export.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Expected root differs from the export root.
    pub root_mismatch: bool,
    /// `leaf_count` disagrees with the number of payloads.
    pub count_mismatch: bool,
    /// Payloads whose index is not their position.
    pub misplaced: Vec<u64>,
    /// Payloads that do not verify.
    pub invalid: Vec<u64>,
}

impl VerifyReport {
    /// Whether every check passed.
    pub fn is_ok(&self) -> bool {
        !self.root_mismatch
            && !self.count_mismatch
            && self.misplaced.is_empty()
            && self.invalid.is_empty()
    }
}

/// Check `export`, optionally against `expected_root`.
pub fn check_export(export: &TreeExport, expected_root: Option<&Hash32>) -> VerifyReport {
    VerifyReport {
        root_mismatch: expected_root.is_some_and(|root| root != &export.root),
        count_mismatch: export.leaf_count != export.claims.len(),
        misplaced: export
            .claims
            .iter()
            .enumerate()
            .filter(|(i, payload)| payload.index != *i as u64)
            .map(|(_, payload)| payload.index)
            .collect(),
        invalid: export.invalid_claims(),
    }
}

/// Execute `airdrop verify`.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let content = std::fs::read_to_string(&args.export)
        .with_context(|| format!("failed to read export: {}", args.export.display()))?;
    let export: TreeExport = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse export: {}", args.export.display()))?;

    let report = check_export(&export, args.root.as_ref());

    println!("  root:     {}", export.root);
    println!("  claims:   {}", export.claims.len());
    if report.root_mismatch {
        if let Some(root) = &args.root {
            println!("  MISMATCH: expected root {root}");
        }
    }
    if report.count_mismatch {
        println!("  MISMATCH: leaf_count is {}", export.leaf_count);
    }
    for index in &report.misplaced {
        println!("  MISPLACED: payload {index}");
    }
    for index in &report.invalid {
        println!("  INVALID:  payload {index}");
    }

    if report.is_ok() {
        println!("  OK");
        Ok(0)
    } else {
        tracing::warn!(
            invalid = report.invalid.len(),
            misplaced = report.misplaced.len(),
            "export verification failed"
        );
        Ok(1)
    }
}
