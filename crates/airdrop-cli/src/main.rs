//! # airdrop CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use airdrop_cli::build::{run_build_tree, run_proof, BuildTreeArgs, ProofArgs};
use airdrop_cli::config::DistributionConfig;
use airdrop_cli::rotate::{run_rotate_check, RotateCheckArgs};
use airdrop_cli::verify::{run_verify, VerifyArgs};

/// Merkle airdrop tooling.
///
/// Builds context-bound Merkle trees over recipient whitelists, produces the
/// root to publish and the claim payload for every recipient, and checks
/// exports and root rotations.
#[derive(Parser, Debug)]
#[command(name = "airdrop", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a distribution config file (YAML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the tree and export the root with every claim payload.
    BuildTree(BuildTreeArgs),

    /// Print the claim payload for one index.
    Proof(ProofArgs),

    /// Verify every payload of an export against its root.
    Verify(VerifyArgs),

    /// Report claimed indices a replacement whitelist would block.
    RotateCheck(RotateCheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.config.as_deref().map(DistributionConfig::load).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    let result = match cli.command {
        Commands::BuildTree(args) => run_build_tree(&args, &config),
        Commands::Proof(args) => run_proof(&args, &config),
        Commands::Verify(args) => run_verify(&args),
        Commands::RotateCheck(args) => run_rotate_check(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
