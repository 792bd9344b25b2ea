//! # Escrow Error Types
//!
//! Every failure aborts only the invocation that raised it. None of them
//! leaves a partial state change behind: an unauthorized call never reads a
//! balance, and a failed transfer never marks the entry released or emits a
//! notification.

use escrow_core::{Amount, EntryId, Identity};
use thiserror::Error;

use crate::transfer::TransferError;

/// Errors arising from escrow operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EscrowError {
    /// The caller is not the entry's arbiter. Nothing was read or moved.
    #[error("{caller} is not authorized to approve {entry_id}")]
    NotAuthorized {
        /// The entry the caller tried to approve.
        entry_id: EntryId,
        /// The identity reported by the oracle.
        caller: Identity,
    },

    /// The value-transfer primitive refused the release. Balance unchanged.
    #[error("release of {amount} from {entry_id} failed: {source}")]
    TransferFailed {
        /// The entry being released.
        entry_id: EntryId,
        /// The balance that was to be released.
        amount: Amount,
        /// The primitive's failure report.
        #[source]
        source: TransferError,
    },

    /// The entry was already released and the release policy forbids
    /// repeat approvals.
    #[error("{entry_id} has already been released")]
    AlreadyReleased {
        /// The released entry.
        entry_id: EntryId,
    },

    /// The depositor's funding could not be placed in custody.
    #[error("funding failed: {source}")]
    FundingFailed {
        /// The primitive's failure report.
        #[source]
        source: TransferError,
    },

    /// No entry with this identifier is held by the host.
    #[error("unknown escrow entry {0}")]
    EntryNotFound(EntryId),
}
