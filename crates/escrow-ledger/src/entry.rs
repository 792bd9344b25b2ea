//! # Escrow Ledger Entry
//!
//! An entry binds three fixed roles: the depositor who funded it, the
//! arbiter who may release it, and the beneficiary who receives it. The
//! custodied value is not stored here; it is whatever the
//! [`ValueTransfer`] primitive reports for the entry at the moment of the
//! call.
//!
//! ## Security Invariant
//!
//! [`EscrowEntry::approve`] resolves the caller and compares it against the
//! stored arbiter before anything else. A mismatch returns
//! [`EscrowError::NotAuthorized`] without reading a balance or touching the
//! ledger. The entry is marked released, and the `Approved` event emitted,
//! only after the primitive confirms the transfer.
//!
//! ## Lifecycle
//!
//! ```text
//! Pending --approve() by arbiter, transfer ok--> Released
//! Pending --approve() by non-arbiter----------> Pending   (NotAuthorized)
//! Pending --approve() by arbiter, transfer err-> Pending  (TransferFailed)
//! Released --approve() by arbiter-------------> Released (Approved(0), or
//!                                                         AlreadyReleased
//!                                                         under the strict policy)
//! Released --approve() by non-arbiter---------> Released (NotAuthorized)
//! ```

use escrow_core::{Amount, EntryId, Identity, Timestamp};
use serde::{Deserialize, Serialize};

use crate::config::ReleasePolicy;
use crate::error::EscrowError;
use crate::event::{EscrowEvent, EventSink};
use crate::oracle::IdentityOracle;
use crate::transfer::ValueTransfer;

// ── Status ─────────────────────────────────────────────────────────────

/// Lifecycle status of an escrow entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryStatus {
    /// Funded and awaiting the arbiter's approval.
    Pending,
    /// The arbiter has released the custodied value. Terminal.
    Released,
}

impl EntryStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Released)
    }

    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Released => "RELEASED",
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Entry ──────────────────────────────────────────────────────────────

/// One three-party escrow.
///
/// Role identities are private and have no setters: they are fixed at
/// [`create`](EscrowEntry::create) for the lifetime of the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowEntry {
    id: EntryId,
    depositor: Identity,
    arbiter: Identity,
    beneficiary: Identity,
    status: EntryStatus,
    created_at: Timestamp,
    released_at: Option<Timestamp>,
}

impl EscrowEntry {
    /// Create and fund a new entry.
    ///
    /// The caller reported by `oracle` becomes the depositor, and `funding`
    /// moves from the depositor's account into custody. A zero `funding` is
    /// valid. Arbiter and beneficiary are not checked for distinctness.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowError::FundingFailed`] if the primitive cannot take
    /// the funding into custody. No entry exists in that case.
    pub fn create<O, L, S>(
        oracle: &O,
        ledger: &mut L,
        events: &mut S,
        arbiter: Identity,
        beneficiary: Identity,
        funding: Amount,
    ) -> Result<Self, EscrowError>
    where
        O: IdentityOracle + ?Sized,
        L: ValueTransfer + ?Sized,
        S: EventSink + ?Sized,
    {
        let id = EntryId::new();
        let depositor = oracle.caller();

        let receipt = ledger
            .deposit(&id, &depositor, funding)
            .map_err(|source| EscrowError::FundingFailed { source })?;

        tracing::info!(
            entry_id = %id,
            depositor = %depositor,
            arbiter = %arbiter,
            beneficiary = %beneficiary,
            funded = %funding,
            reference = receipt.reference,
            "escrow entry created"
        );

        let event = EscrowEvent::created(
            id,
            depositor.clone(),
            arbiter.clone(),
            beneficiary.clone(),
            funding,
        );
        let created_at = event.recorded_at;
        events.emit(event);

        Ok(Self {
            id,
            depositor,
            arbiter,
            beneficiary,
            status: EntryStatus::Pending,
            created_at,
            released_at: None,
        })
    }

    /// Release the entire custodied balance to the beneficiary.
    ///
    /// Steps, in order: resolve the caller and require it to be the arbiter;
    /// apply the release policy; snapshot the live balance; ask the primitive
    /// to move that balance to the beneficiary; on confirmed success mark the
    /// entry released and emit `Approved(amount)`.
    ///
    /// Returns the amount moved. After a release, a repeat approval under
    /// [`ReleasePolicy::AllowReapproval`] moves the (zero) live balance and
    /// emits `Approved(0)`.
    ///
    /// # Errors
    ///
    /// - [`EscrowError::NotAuthorized`] if the caller is not the arbiter.
    /// - [`EscrowError::AlreadyReleased`] if the entry is released and the
    ///   policy is [`ReleasePolicy::RejectAfterRelease`].
    /// - [`EscrowError::TransferFailed`] if the primitive refuses the move.
    ///
    /// No state changes and no event is emitted on any error.
    pub fn approve<O, L, S>(
        &mut self,
        oracle: &O,
        ledger: &mut L,
        events: &mut S,
        policy: ReleasePolicy,
    ) -> Result<Amount, EscrowError>
    where
        O: IdentityOracle + ?Sized,
        L: ValueTransfer + ?Sized,
        S: EventSink + ?Sized,
    {
        let caller = oracle.caller();
        if caller != self.arbiter {
            tracing::warn!(
                entry_id = %self.id,
                caller = %caller,
                "approval rejected: caller is not the arbiter"
            );
            return Err(EscrowError::NotAuthorized {
                entry_id: self.id,
                caller,
            });
        }

        if self.status.is_terminal() && policy == ReleasePolicy::RejectAfterRelease {
            return Err(EscrowError::AlreadyReleased { entry_id: self.id });
        }

        let amount = ledger.balance(&self.id);
        tracing::debug!(entry_id = %self.id, balance = %amount, "custody snapshot");

        let receipt = ledger
            .transfer(&self.id, &self.beneficiary, amount)
            .map_err(|source| {
                tracing::warn!(
                    entry_id = %self.id,
                    amount = %amount,
                    error = %source,
                    "release transfer failed"
                );
                EscrowError::TransferFailed {
                    entry_id: self.id,
                    amount,
                    source,
                }
            })?;

        let event = EscrowEvent::approved(self.id, amount);
        if self.status.is_terminal() {
            tracing::debug!(entry_id = %self.id, amount = %amount, "repeat approval after release");
        } else {
            self.status = EntryStatus::Released;
            self.released_at = Some(event.recorded_at);
            tracing::info!(
                entry_id = %self.id,
                beneficiary = %self.beneficiary,
                amount = %amount,
                reference = receipt.reference,
                "escrow released"
            );
        }

        events.emit(event);
        Ok(amount)
    }

    /// The entry's identifier.
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// The party that funded the entry.
    pub fn depositor(&self) -> &Identity {
        &self.depositor
    }

    /// The party authorized to release.
    pub fn arbiter(&self) -> &Identity {
        &self.arbiter
    }

    /// The party eligible to receive.
    pub fn beneficiary(&self) -> &Identity {
        &self.beneficiary
    }

    /// Current lifecycle status.
    pub fn status(&self) -> EntryStatus {
        self.status
    }

    /// When the entry was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// When the first successful release happened.
    pub fn released_at(&self) -> Option<Timestamp> {
        self.released_at
    }

    /// The custodied value, read live from the primitive.
    pub fn custodied_value<L: ValueTransfer + ?Sized>(&self, ledger: &L) -> Amount {
        ledger.balance(&self.id)
    }
}
