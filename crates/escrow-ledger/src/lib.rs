//! # escrow-ledger — Arbiter-Gated Escrow
//!
//! A depositor places value under custody; a single arbiter may release it;
//! only the named beneficiary may receive it.
//!
//! - **Entry** ([`entry`]): the escrow ledger entry and its one state-changing
//!   operation, [`EscrowEntry::approve`].
//!
//! - **Collaborators** ([`oracle`], [`transfer`]): the [`IdentityOracle`]
//!   that names the current caller, and the [`ValueTransfer`] primitive that
//!   holds custodied value and moves it on request.
//!
//! - **Events** ([`event`]): release notifications, emitted only after the
//!   value movement has been confirmed.
//!
//! - **Host** ([`host`]): a registry owning entries, ledger, and event sink.
//!   Every mutating call takes `&mut self`, so operations on an entry never
//!   interleave.
//!
//! - **Reference ledger** ([`memory`]): an in-memory [`ValueTransfer`]
//!   implementation used by tests and the simulation CLI.

pub mod config;
pub mod entry;
pub mod error;
pub mod event;
pub mod host;
pub mod memory;
pub mod oracle;
pub mod transfer;

// Re-export primary types.
pub use config::{ConfigError, EscrowConfig, ReleasePolicy};
pub use entry::{EntryStatus, EscrowEntry};
pub use error::EscrowError;
pub use event::{EscrowEvent, EventKind, EventLog, EventSink};
pub use host::EscrowHost;
pub use memory::InMemoryLedger;
pub use oracle::{FixedCaller, IdentityOracle};
pub use transfer::{TransferError, TransferReceipt, ValueTransfer};
