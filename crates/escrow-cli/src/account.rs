//! # Account Subcommand
//!
//! Manipulates the simulated ledger directly: seed balances, refuse or
//! accept credits, and read balances. None of these touch escrow entries.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use escrow_core::{Amount, Identity};

use crate::state::SimulationState;

/// Arguments for the `escrow account` subcommand.
#[derive(Args, Debug)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommand,
}

/// Account subcommands.
#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// Credit test funds to an account.
    Mint {
        /// Account to credit.
        #[arg(long, value_parser = Identity::parse)]
        to: Identity,
        /// Amount in smallest units.
        #[arg(long)]
        amount: Amount,
    },

    /// Show an account's spendable balance.
    Balance {
        /// Account to query.
        #[arg(long, value_parser = Identity::parse)]
        of: Identity,
    },

    /// Refuse all further credits to an account.
    Freeze {
        /// Account to freeze.
        #[arg(long, value_parser = Identity::parse)]
        account: Identity,
    },

    /// Accept credits to an account again.
    Unfreeze {
        /// Account to unfreeze.
        #[arg(long, value_parser = Identity::parse)]
        account: Identity,
    },
}

/// Execute the account subcommand.
pub fn run_account(args: &AccountArgs, state_path: &Path) -> Result<u8> {
    let mut state = SimulationState::load(state_path)?;

    match &args.command {
        AccountCommand::Mint { to, amount } => {
            let balance = state
                .ledger
                .mint(to, *amount)
                .with_context(|| format!("cannot mint {amount} to {to}"))?;
            state.save(state_path)?;
            println!("OK: minted {amount} to {to} (balance {balance})");
        }
        AccountCommand::Balance { of } => {
            let frozen = if state.ledger.is_frozen(of) { " (frozen)" } else { "" };
            println!("{of}: {}{frozen}", state.ledger.account_balance(of));
        }
        AccountCommand::Freeze { account } => {
            state.ledger.freeze(account);
            state.save(state_path)?;
            println!("OK: {account} frozen");
        }
        AccountCommand::Unfreeze { account } => {
            state.ledger.unfreeze(account);
            state.save(state_path)?;
            println!("OK: {account} unfrozen");
        }
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(command: AccountCommand, path: &Path) -> Result<u8> {
        run_account(&AccountArgs { command }, path)
    }

    #[test]
    fn mint_persists_balance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let code = run(
            AccountCommand::Mint {
                to: Identity::new("alice"),
                amount: Amount::new(30),
            },
            &path,
        )
        .unwrap();
        assert_eq!(code, 0);
        run(
            AccountCommand::Mint {
                to: Identity::new("alice"),
                amount: Amount::new(12),
            },
            &path,
        )
        .unwrap();

        let state = SimulationState::load(&path).unwrap();
        assert_eq!(
            state.ledger.account_balance(&Identity::new("alice")),
            Amount::new(42)
        );
    }

    #[test]
    fn freeze_then_unfreeze() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let bob = Identity::new("bob");

        run(AccountCommand::Freeze { account: bob.clone() }, &path).unwrap();
        assert!(SimulationState::load(&path).unwrap().ledger.is_frozen(&bob));

        run(AccountCommand::Unfreeze { account: bob.clone() }, &path).unwrap();
        assert!(!SimulationState::load(&path).unwrap().ledger.is_frozen(&bob));
    }

    #[test]
    fn balance_does_not_create_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        run(AccountCommand::Balance { of: Identity::new("nobody") }, &path).unwrap();
        assert!(!path.exists());
    }
}
