//! # escrow CLI entry point
//!
//! Parses command-line arguments, resolves configuration, and dispatches
//! to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use escrow_cli::account::{run_account, AccountArgs};
use escrow_cli::entry::{run_entry, EntryArgs};
use escrow_ledger::EscrowConfig;

/// Arbiter escrow simulator.
///
/// Funds escrow entries from simulated accounts, releases them on the
/// arbiter's approval, and records release notifications, all against a
/// local JSON state file.
#[derive(Parser, Debug)]
#[command(name = "escrow", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file. Overrides ESCROW_RELEASE_POLICY.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the simulation state file.
    #[arg(long, global = true, default_value = "escrow-state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulated ledger accounts (mint, balance, freeze, unfreeze).
    Account(AccountArgs),

    /// Escrow entries (create, approve, show, balance, events).
    Entry(EntryArgs),
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
        .init();

    tracing::debug!(state = %cli.state.display(), "escrow CLI starting");

    let result = load_config(cli.config.as_ref()).and_then(|config| {
        tracing::debug!(release_policy = %config.release_policy, "configuration resolved");
        match &cli.command {
            Commands::Account(args) => run_account(args, &cli.state),
            Commands::Entry(args) => run_entry(args, &cli.state, &config),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// An explicit config file wins; otherwise read the environment.
fn load_config(path: Option<&PathBuf>) -> Result<EscrowConfig> {
    match path {
        Some(path) => EscrowConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => EscrowConfig::from_env().context("invalid escrow environment configuration"),
    }
}
