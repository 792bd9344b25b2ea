//! # escrow-cli — Local Escrow Simulation
//!
//! Provides the `escrow` command-line interface over a single JSON state
//! file holding an in-memory ledger, the escrow entries, and the event log.
//!
//! ## Subcommands
//!
//! - `escrow account` — Mint test balances, freeze or unfreeze accounts,
//!   and query account balances.
//! - `escrow entry` — Create and fund entries, approve releases, show an
//!   entry, and print release notifications.
//!
//! ```bash
//! escrow account mint --to alice --amount 100
//! escrow entry create --as alice --arbiter arb --beneficiary bob --amount 100
//! escrow entry approve --as arb --id escrow:<uuid>
//! ```
//!
//! ## Exit codes
//!
//! `0` on success, `2` when the escrow refused the operation (unauthorized
//! caller, failed transfer, repeat release under the strict policy), `1` on
//! any other error.

pub mod account;
pub mod entry;
pub mod state;

use escrow_ledger::EscrowError;

/// Exit code for an operation the escrow itself refused.
pub const EXIT_REFUSED: u8 = 2;

/// Map an escrow outcome to a process exit code, printing the refusal.
///
/// Refusals are expected outcomes of the state machine rather than tool
/// failures, so they are reported on stdout with a distinct exit code.
pub fn refusal_exit_code(err: &EscrowError) -> Option<u8> {
    match err {
        EscrowError::NotAuthorized { .. }
        | EscrowError::TransferFailed { .. }
        | EscrowError::AlreadyReleased { .. }
        | EscrowError::FundingFailed { .. } => {
            println!("REFUSED: {err}");
            Some(EXIT_REFUSED)
        }
        EscrowError::EntryNotFound(_) => None,
    }
}
