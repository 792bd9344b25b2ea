//! # Entry Subcommand
//!
//! Escrow entry commands. The `--as` flag names the caller; it is turned
//! into a [`FixedCaller`] oracle, so the escrow sees it exactly as it would
//! see an authenticated caller from any other front-end.
//!
//! ## Subcommands
//!
//! - `create` — Fund a new entry; the `--as` identity becomes depositor.
//! - `approve` — Release an entry's custody to its beneficiary.
//! - `show` — Show an entry's roles, status, and live balance.
//! - `balance` — Print an entry's custodied value.
//! - `events` — Print notifications as JSON lines.

use std::path::Path;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use escrow_core::{Amount, EntryId, Identity};
use escrow_ledger::{EscrowConfig, EscrowError, FixedCaller, ValueTransfer};

use crate::refusal_exit_code;
use crate::state::SimulationState;

/// Arguments for the `escrow entry` subcommand.
#[derive(Args, Debug)]
pub struct EntryArgs {
    #[command(subcommand)]
    pub command: EntryCommand,
}

/// Entry subcommands.
#[derive(Subcommand, Debug)]
pub enum EntryCommand {
    /// Create and fund a new escrow entry.
    Create {
        /// Caller identity; becomes the depositor.
        #[arg(long = "as", value_parser = Identity::parse)]
        caller: Identity,
        /// Identity authorized to release.
        #[arg(long, value_parser = Identity::parse)]
        arbiter: Identity,
        /// Identity that receives the release.
        #[arg(long, value_parser = Identity::parse)]
        beneficiary: Identity,
        /// Funding in smallest units, taken from the caller's account.
        #[arg(long, default_value = "0")]
        amount: Amount,
    },

    /// Release an entry's full custody to its beneficiary.
    Approve {
        /// Caller identity; must be the entry's arbiter.
        #[arg(long = "as", value_parser = Identity::parse)]
        caller: Identity,
        /// Entry identifier (escrow:<uuid> or <uuid>).
        #[arg(long)]
        id: EntryId,
    },

    /// Show an entry.
    Show {
        /// Entry identifier.
        #[arg(long)]
        id: EntryId,
    },

    /// Print an entry's custodied value.
    Balance {
        /// Entry identifier.
        #[arg(long)]
        id: EntryId,
    },

    /// Print emitted notifications as JSON lines.
    Events {
        /// Only events for this entry.
        #[arg(long)]
        id: Option<EntryId>,
    },
}

/// Execute the entry subcommand.
pub fn run_entry(args: &EntryArgs, state_path: &Path, config: &EscrowConfig) -> Result<u8> {
    let state = SimulationState::load(state_path)?;

    match &args.command {
        EntryCommand::Create {
            caller,
            arbiter,
            beneficiary,
            amount,
        } => cmd_create(state, state_path, config, caller, arbiter, beneficiary, *amount),
        EntryCommand::Approve { caller, id } => cmd_approve(state, state_path, config, caller, id),
        EntryCommand::Show { id } => cmd_show(&state, id),
        EntryCommand::Balance { id } => cmd_balance(&state, id),
        EntryCommand::Events { id } => cmd_events(&state, id.as_ref()),
    }
}

fn cmd_create(
    state: SimulationState,
    state_path: &Path,
    config: &EscrowConfig,
    caller: &Identity,
    arbiter: &Identity,
    beneficiary: &Identity,
    amount: Amount,
) -> Result<u8> {
    let mut host = state.into_host(config.clone());
    let id = match host.create(
        &FixedCaller::new(caller.clone()),
        arbiter.clone(),
        beneficiary.clone(),
        amount,
    ) {
        Ok(id) => id,
        Err(e) => return refused_or_error(e),
    };
    SimulationState::from_host(host).save(state_path)?;

    println!("OK: created {id} funded with {amount}");
    Ok(0)
}

fn cmd_approve(
    state: SimulationState,
    state_path: &Path,
    config: &EscrowConfig,
    caller: &Identity,
    id: &EntryId,
) -> Result<u8> {
    let mut host = state.into_host(config.clone());
    let released = match host.approve(id, &FixedCaller::new(caller.clone())) {
        Ok(amount) => amount,
        Err(e) => return refused_or_error(e),
    };
    SimulationState::from_host(host).save(state_path)?;

    println!("OK: {id} approved, released {released}");
    Ok(0)
}

fn cmd_show(state: &SimulationState, id: &EntryId) -> Result<u8> {
    let Some(entry) = state.entries.iter().find(|e| &e.id() == id) else {
        bail!("entry not found: {id}");
    };

    println!("Entry: {id}");
    println!("  Status: {}", entry.status());
    println!("  Depositor: {}", entry.depositor());
    println!("  Arbiter: {}", entry.arbiter());
    println!("  Beneficiary: {}", entry.beneficiary());
    println!("  Custody: {}", state.ledger.balance(id));
    println!("  Created: {}", entry.created_at());
    if let Some(released_at) = entry.released_at() {
        println!("  Released: {released_at}");
    }
    Ok(0)
}

fn cmd_balance(state: &SimulationState, id: &EntryId) -> Result<u8> {
    if !state.entries.iter().any(|e| &e.id() == id) {
        bail!("entry not found: {id}");
    }
    println!("{}", state.ledger.balance(id));
    Ok(0)
}

fn cmd_events(state: &SimulationState, id: Option<&EntryId>) -> Result<u8> {
    for event in state.events.events() {
        if id.map_or(true, |id| &event.entry_id == id) {
            println!("{}", serde_json::to_string(event)?);
        }
    }
    Ok(0)
}

/// Refusals exit with a distinct code and leave the state file untouched.
fn refused_or_error(err: EscrowError) -> Result<u8> {
    match refusal_exit_code(&err) {
        Some(code) => Ok(code),
        None => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EXIT_REFUSED;

    fn setup(units: u64) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut state = SimulationState::default();
        state.ledger.mint(&Identity::new("alice"), Amount::new(units)).unwrap();
        state.save(&path).unwrap();
        (dir, path)
    }

    fn create(path: &Path, amount: u64) -> EntryId {
        let args = EntryArgs {
            command: EntryCommand::Create {
                caller: Identity::new("alice"),
                arbiter: Identity::new("arb"),
                beneficiary: Identity::new("bob"),
                amount: Amount::new(amount),
            },
        };
        assert_eq!(run_entry(&args, path, &EscrowConfig::default()).unwrap(), 0);
        SimulationState::load(path).unwrap().entries[0].id()
    }

    fn approve(path: &Path, caller: &str, id: EntryId, config: &EscrowConfig) -> u8 {
        let args = EntryArgs {
            command: EntryCommand::Approve {
                caller: Identity::new(caller),
                id,
            },
        };
        run_entry(&args, path, config).unwrap()
    }

    #[test]
    fn create_then_approve() {
        let (_dir, path) = setup(100);
        let id = create(&path, 100);

        assert_eq!(approve(&path, "arb", id, &EscrowConfig::default()), 0);

        let state = SimulationState::load(&path).unwrap();
        assert_eq!(state.ledger.balance(&id), Amount::ZERO);
        assert_eq!(
            state.ledger.account_balance(&Identity::new("bob")),
            Amount::new(100)
        );
        assert_eq!(state.events.approvals(&id), vec![Amount::new(100)]);
    }

    #[test]
    fn unauthorized_approve_leaves_file_untouched() {
        let (_dir, path) = setup(100);
        let id = create(&path, 100);
        let before = std::fs::read_to_string(&path).unwrap();

        assert_eq!(
            approve(&path, "mallory", id, &EscrowConfig::default()),
            EXIT_REFUSED
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn frozen_beneficiary_refuses_release() {
        let (_dir, path) = setup(10);
        let id = create(&path, 10);
        let mut state = SimulationState::load(&path).unwrap();
        state.ledger.freeze(&Identity::new("bob"));
        state.save(&path).unwrap();

        assert_eq!(approve(&path, "arb", id, &EscrowConfig::default()), EXIT_REFUSED);
        let state = SimulationState::load(&path).unwrap();
        assert_eq!(state.ledger.balance(&id), Amount::new(10));
        assert!(state.events.approvals(&id).is_empty());
    }

    #[test]
    fn strict_config_refuses_second_approval() {
        let (_dir, path) = setup(10);
        let id = create(&path, 10);
        let strict = EscrowConfig::with_policy(escrow_ledger::ReleasePolicy::RejectAfterRelease);

        assert_eq!(approve(&path, "arb", id, &strict), 0);
        assert_eq!(approve(&path, "arb", id, &strict), EXIT_REFUSED);
        assert_eq!(approve(&path, "arb", id, &EscrowConfig::default()), 0);

        let state = SimulationState::load(&path).unwrap();
        assert_eq!(
            state.events.approvals(&id),
            vec![Amount::new(10), Amount::ZERO]
        );
    }

    #[test]
    fn underfunded_create_is_refused() {
        let (_dir, path) = setup(5);
        let args = EntryArgs {
            command: EntryCommand::Create {
                caller: Identity::new("alice"),
                arbiter: Identity::new("arb"),
                beneficiary: Identity::new("bob"),
                amount: Amount::new(6),
            },
        };
        assert_eq!(
            run_entry(&args, &path, &EscrowConfig::default()).unwrap(),
            EXIT_REFUSED
        );
        assert!(SimulationState::load(&path).unwrap().entries.is_empty());
    }

    #[test]
    fn approve_unknown_entry_is_an_error() {
        let (_dir, path) = setup(0);
        let args = EntryArgs {
            command: EntryCommand::Approve {
                caller: Identity::new("arb"),
                id: EntryId::new(),
            },
        };
        assert!(run_entry(&args, &path, &EscrowConfig::default()).is_err());
    }

    #[test]
    fn show_unknown_entry_is_an_error() {
        let (_dir, path) = setup(0);
        let args = EntryArgs {
            command: EntryCommand::Show { id: EntryId::new() },
        };
        assert!(run_entry(&args, &path, &EscrowConfig::default()).is_err());
    }

    #[test]
    fn balance_reports_custody_and_rejects_unknown_entries() {
        let (_dir, path) = setup(8);
        let id = create(&path, 8);
        let known = EntryArgs {
            command: EntryCommand::Balance { id },
        };
        let unknown = EntryArgs {
            command: EntryCommand::Balance { id: EntryId::new() },
        };
        assert_eq!(run_entry(&known, &path, &EscrowConfig::default()).unwrap(), 0);
        assert!(run_entry(&unknown, &path, &EscrowConfig::default()).is_err());
    }

    #[test]
    fn show_and_events_succeed() {
        let (_dir, path) = setup(3);
        let id = create(&path, 3);
        let show = EntryArgs {
            command: EntryCommand::Show { id },
        };
        let events = EntryArgs {
            command: EntryCommand::Events { id: Some(id) },
        };
        assert_eq!(run_entry(&show, &path, &EscrowConfig::default()).unwrap(), 0);
        assert_eq!(run_entry(&events, &path, &EscrowConfig::default()).unwrap(), 0);
    }
}
