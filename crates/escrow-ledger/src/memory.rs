//! # In-Memory Ledger
//!
//! A [`ValueTransfer`] implementation backed by ordered maps. It keeps
//! identity account balances and per-entry custody balances, and can be
//! told to refuse credits to particular identities, which is how transfer
//! failure is simulated.
//!
//! Every movement validates all of its preconditions before touching a
//! balance, so a failed call leaves the ledger unchanged.

use std::collections::{BTreeMap, BTreeSet};

use escrow_core::{Amount, EntryId, Identity};
use serde::{Deserialize, Serialize};

use crate::transfer::{TransferError, TransferReceipt, ValueTransfer};

/// Ordered, serializable reference ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryLedger {
    accounts: BTreeMap<Identity, Amount>,
    custody: BTreeMap<EntryId, Amount>,
    frozen: BTreeSet<Identity>,
    next_reference: u64,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `holder` out of thin air.
    ///
    /// Simulation only: there is no supply accounting.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Overflow`] if the balance would overflow.
    pub fn mint(&mut self, holder: &Identity, amount: Amount) -> Result<Amount, TransferError> {
        let updated = self
            .account_balance(holder)
            .checked_add(amount)
            .ok_or_else(|| TransferError::Overflow {
                holder: holder.to_string(),
            })?;
        self.accounts.insert(holder.clone(), updated);
        Ok(updated)
    }

    /// The spendable balance of an identity's account.
    pub fn account_balance(&self, holder: &Identity) -> Amount {
        self.accounts.get(holder).copied().unwrap_or_default()
    }

    /// Refuse all further credits to `holder`.
    pub fn freeze(&mut self, holder: &Identity) {
        self.frozen.insert(holder.clone());
    }

    /// Accept credits to `holder` again.
    pub fn unfreeze(&mut self, holder: &Identity) {
        self.frozen.remove(holder);
    }

    /// Whether credits to `holder` are currently refused.
    pub fn is_frozen(&self, holder: &Identity) -> bool {
        self.frozen.contains(holder)
    }

    /// Sum of all account and custody balances, or `None` on overflow.
    pub fn total_supply(&self) -> Option<Amount> {
        self.accounts
            .values()
            .chain(self.custody.values())
            .try_fold(Amount::ZERO, |acc, v| acc.checked_add(*v))
    }

    fn issue_receipt(&mut self, entry_id: &EntryId, amount: Amount) -> TransferReceipt {
        self.next_reference += 1;
        TransferReceipt {
            reference: self.next_reference,
            entry_id: *entry_id,
            amount,
        }
    }
}

impl ValueTransfer for InMemoryLedger {
    fn balance(&self, entry_id: &EntryId) -> Amount {
        self.custody.get(entry_id).copied().unwrap_or_default()
    }

    fn deposit(
        &mut self,
        entry_id: &EntryId,
        from: &Identity,
        amount: Amount,
    ) -> Result<TransferReceipt, TransferError> {
        let available = self.account_balance(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or_else(|| TransferError::InsufficientFunds {
                holder: from.clone(),
                requested: amount,
                available,
            })?;
        let held = self
            .balance(entry_id)
            .checked_add(amount)
            .ok_or_else(|| TransferError::Overflow {
                holder: entry_id.to_string(),
            })?;

        if self.accounts.contains_key(from) {
            self.accounts.insert(from.clone(), remaining);
        }
        self.custody.insert(*entry_id, held);
        Ok(self.issue_receipt(entry_id, amount))
    }

    fn transfer(
        &mut self,
        entry_id: &EntryId,
        target: &Identity,
        amount: Amount,
    ) -> Result<TransferReceipt, TransferError> {
        if self.is_frozen(target) {
            return Err(TransferError::Rejected {
                target: target.clone(),
                reason: "account frozen".to_string(),
            });
        }
        let available = self
            .custody
            .get(entry_id)
            .copied()
            .ok_or(TransferError::UnknownEntry(*entry_id))?;
        let remaining =
            available
                .checked_sub(amount)
                .ok_or_else(|| TransferError::InsufficientCustody {
                    entry_id: *entry_id,
                    requested: amount,
                    available,
                })?;
        let credited = self
            .account_balance(target)
            .checked_add(amount)
            .ok_or_else(|| TransferError::Overflow {
                holder: target.to_string(),
            })?;

        self.custody.insert(*entry_id, remaining);
        self.accounts.insert(target.clone(), credited);
        Ok(self.issue_receipt(entry_id, amount))
    }
}
