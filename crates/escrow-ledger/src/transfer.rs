//! # Value-Transfer Primitive
//!
//! Defines the [`ValueTransfer`] trait: the external substrate that holds
//! custodied value on behalf of escrow entries and moves it on request. The
//! escrow owns no balance counter of its own; the custodied amount is always
//! whatever [`ValueTransfer::balance`] reports at the time of the call.
//!
//! ## Contract
//!
//! Every movement is all-or-nothing. On `Ok`, the value has moved and is no
//! longer attributed to the entry. On `Err`, nothing moved and every balance
//! is exactly as it was before the call.
//!
//! Methods are synchronous: the outcome of a transfer is known before the
//! call returns, which is what lets the escrow decide whether to emit a
//! release notification within the same invocation.

use escrow_core::{Amount, EntryId, Identity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Failure reported by a value-transfer primitive.
///
/// Every variant implies that no value moved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The target account refused the credit (frozen, closed, sanctioned).
    #[error("credit to {target} rejected: {reason}")]
    Rejected {
        /// The identity that was to be credited.
        target: Identity,
        /// Human-readable rejection reason.
        reason: String,
    },

    /// The entry holds less than the requested amount.
    #[error("{entry_id} holds {available}, cannot move {requested}")]
    InsufficientCustody {
        /// The entry whose custody was debited.
        entry_id: EntryId,
        /// Amount requested.
        requested: Amount,
        /// Amount actually held.
        available: Amount,
    },

    /// The funding account holds less than the requested amount.
    #[error("account {holder} holds {available}, cannot fund {requested}")]
    InsufficientFunds {
        /// The account that was to be debited.
        holder: Identity,
        /// Amount requested.
        requested: Amount,
        /// Amount actually available.
        available: Amount,
    },

    /// Crediting the amount would overflow the holder's balance.
    #[error("balance overflow crediting {holder}")]
    Overflow {
        /// The account or entry that would overflow.
        holder: String,
    },

    /// The primitive has no custody record for this entry.
    #[error("no custody record for {0}")]
    UnknownEntry(EntryId),
}

// ---------------------------------------------------------------------------
// Receipt
// ---------------------------------------------------------------------------

/// Confirmation of a completed value movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Primitive-assigned reference, unique per successful movement.
    pub reference: u64,
    /// The entry whose custody was credited or debited.
    pub entry_id: EntryId,
    /// The amount moved.
    pub amount: Amount,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// The account-credit substrate holding escrowed value.
///
/// The trait is object-safe so hosts can be built over
/// `Box<dyn ValueTransfer>` when the concrete ledger is chosen at runtime.
pub trait ValueTransfer {
    /// The value currently held in custody for `entry_id`.
    ///
    /// Entries the primitive has never seen hold zero.
    fn balance(&self, entry_id: &EntryId) -> Amount;

    /// Move `amount` from the account of `from` into custody for `entry_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`] if the funding account cannot cover the
    /// amount or the custody balance would overflow. Nothing moves on error.
    fn deposit(
        &mut self,
        entry_id: &EntryId,
        from: &Identity,
        amount: Amount,
    ) -> Result<TransferReceipt, TransferError>;

    /// Move `amount` out of custody for `entry_id` and credit it to `target`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`] if the target refuses the credit, the
    /// entry holds less than `amount`, or the credit would overflow. Nothing
    /// moves on error.
    fn transfer(
        &mut self,
        entry_id: &EntryId,
        target: &Identity,
        amount: Amount,
    ) -> Result<TransferReceipt, TransferError>;
}

impl<T: ValueTransfer + ?Sized> ValueTransfer for Box<T> {
    fn balance(&self, entry_id: &EntryId) -> Amount {
        (**self).balance(entry_id)
    }

    fn deposit(
        &mut self,
        entry_id: &EntryId,
        from: &Identity,
        amount: Amount,
    ) -> Result<TransferReceipt, TransferError> {
        (**self).deposit(entry_id, from, amount)
    }

    fn transfer(
        &mut self,
        entry_id: &EntryId,
        target: &Identity,
        amount: Amount,
    ) -> Result<TransferReceipt, TransferError> {
        (**self).transfer(entry_id, target, amount)
    }
}
