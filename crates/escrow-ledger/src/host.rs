//! # Escrow Host
//!
//! Owns a set of escrow entries together with the value-transfer primitive
//! and the event sink they share. Construction returns an [`EntryId`]
//! handle; approval and queries go through that handle.
//!
//! Every mutating method takes `&mut self`, so the authorization check,
//! balance snapshot, transfer, and notification of one call complete before
//! any other call on the host can start. Callers that need to share a host
//! across threads wrap it in a mutex; the host itself does no locking.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use escrow_core::{Amount, EntryId, Identity};

use crate::config::EscrowConfig;
use crate::entry::EscrowEntry;
use crate::error::EscrowError;
use crate::event::EventSink;
use crate::oracle::IdentityOracle;
use crate::transfer::ValueTransfer;

/// Registry of escrow entries over one ledger and one event sink.
#[derive(Debug)]
pub struct EscrowHost<L, S> {
    config: EscrowConfig,
    ledger: L,
    events: S,
    entries: BTreeMap<EntryId, EscrowEntry>,
}

impl<L: ValueTransfer, S: EventSink> EscrowHost<L, S> {
    /// An empty host.
    pub fn new(config: EscrowConfig, ledger: L, events: S) -> Self {
        Self::from_parts(config, ledger, events, Vec::new())
    }

    /// Rebuild a host from previously persisted parts.
    ///
    /// If two entries share an id, the first one is kept and the duplicate
    /// is logged and discarded.
    pub fn from_parts(
        config: EscrowConfig,
        ledger: L,
        events: S,
        entries: impl IntoIterator<Item = EscrowEntry>,
    ) -> Self {
        let mut by_id = BTreeMap::new();
        for entry in entries {
            match by_id.entry(entry.id()) {
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
                Entry::Occupied(_) => {
                    tracing::warn!(entry_id = %entry.id(), "duplicate escrow entry discarded");
                }
            }
        }
        Self {
            config,
            ledger,
            events,
            entries: by_id,
        }
    }

    /// Create and fund a new entry with the oracle's caller as depositor.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowError::FundingFailed`] if the funding cannot be taken
    /// into custody.
    pub fn create<O: IdentityOracle + ?Sized>(
        &mut self,
        oracle: &O,
        arbiter: Identity,
        beneficiary: Identity,
        funding: Amount,
    ) -> Result<EntryId, EscrowError> {
        let entry = EscrowEntry::create(
            oracle,
            &mut self.ledger,
            &mut self.events,
            arbiter,
            beneficiary,
            funding,
        )?;
        let id = entry.id();
        self.entries.insert(id, entry);
        Ok(id)
    }

    /// Approve release of an entry on behalf of the oracle's caller.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowError::EntryNotFound`] for an unknown handle, and
    /// otherwise whatever [`EscrowEntry::approve`] returns.
    pub fn approve<O: IdentityOracle + ?Sized>(
        &mut self,
        entry_id: &EntryId,
        oracle: &O,
    ) -> Result<Amount, EscrowError> {
        let policy = self.config.release_policy;
        let entry = self
            .entries
            .get_mut(entry_id)
            .ok_or(EscrowError::EntryNotFound(*entry_id))?;
        entry.approve(oracle, &mut self.ledger, &mut self.events, policy)
    }

    /// Look up an entry.
    pub fn entry(&self, entry_id: &EntryId) -> Option<&EscrowEntry> {
        self.entries.get(entry_id)
    }

    /// The live custodied balance of an entry.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowError::EntryNotFound`] for an unknown handle.
    pub fn balance(&self, entry_id: &EntryId) -> Result<Amount, EscrowError> {
        let entry = self
            .entries
            .get(entry_id)
            .ok_or(EscrowError::EntryNotFound(*entry_id))?;
        Ok(entry.custodied_value(&self.ledger))
    }

    /// All entries, ordered by identifier.
    pub fn entries(&self) -> impl Iterator<Item = &EscrowEntry> {
        self.entries.values()
    }

    /// The active configuration.
    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    /// Read-only access to the value-transfer primitive.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Read-only access to the event sink.
    pub fn events(&self) -> &S {
        &self.events
    }

    /// Take the host apart for persistence.
    pub fn into_parts(self) -> (L, S, Vec<EscrowEntry>) {
        (self.ledger, self.events, self.entries.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReleasePolicy;
    use crate::event::EventLog;
    use crate::memory::InMemoryLedger;
    use crate::oracle::FixedCaller;

    fn host_with_funds(units: u64) -> EscrowHost<InMemoryLedger, EventLog> {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(&Identity::new("alice"), Amount::new(units)).unwrap();
        EscrowHost::new(EscrowConfig::default(), ledger, EventLog::new())
    }

    #[test]
    fn create_returns_handle() {
        let mut host = host_with_funds(100);
        let id = host
            .create(
                &FixedCaller::new("alice"),
                Identity::new("arbiter"),
                Identity::new("bob"),
                Amount::new(100),
            )
            .unwrap();
        let entry = host.entry(&id).unwrap();
        assert_eq!(entry.depositor().as_str(), "alice");
        assert_eq!(host.balance(&id).unwrap(), Amount::new(100));
        assert_eq!(host.entries().count(), 1);
    }

    #[test]
    fn from_parts_keeps_first_of_duplicate_ids() {
        let mut host = host_with_funds(10);
        let id = host
            .create(
                &FixedCaller::new("alice"),
                Identity::new("arbiter"),
                Identity::new("bob"),
                Amount::new(10),
            )
            .unwrap();
        let (ledger, events, entries) = host.into_parts();
        let mut released = entries[0].clone();
        let mut scratch_ledger = ledger.clone();
        released
            .approve(
                &FixedCaller::new("arbiter"),
                &mut scratch_ledger,
                &mut EventLog::new(),
                ReleasePolicy::default(),
            )
            .unwrap();

        let duplicated = vec![entries[0].clone(), released];
        let host = EscrowHost::from_parts(EscrowConfig::default(), ledger, events, duplicated);

        assert_eq!(host.entries().count(), 1);
        assert_eq!(host.entry(&id).unwrap().status(), crate::entry::EntryStatus::Pending);
        assert_eq!(host.balance(&id).unwrap(), Amount::new(10));
    }

    #[test]
    fn failed_funding_registers_nothing() {
        let mut host = host_with_funds(10);
        let result = host.create(
            &FixedCaller::new("alice"),
            Identity::new("arbiter"),
            Identity::new("bob"),
            Amount::new(11),
        );
        assert!(matches!(result, Err(EscrowError::FundingFailed { .. })));
        assert_eq!(host.entries().count(), 0);
        assert!(host.events().is_empty());
    }

    #[test]
    fn unknown_entry_is_reported() {
        let mut host = host_with_funds(0);
        let missing = EntryId::new();
        assert_eq!(
            host.approve(&missing, &FixedCaller::new("arbiter")),
            Err(EscrowError::EntryNotFound(missing))
        );
        assert_eq!(host.balance(&missing), Err(EscrowError::EntryNotFound(missing)));
    }

    #[test]
    fn entries_are_independent() {
        let mut host = host_with_funds(30);
        let depositor = FixedCaller::new("alice");
        let first = host
            .create(&depositor, Identity::new("arb-1"), Identity::new("bob"), Amount::new(10))
            .unwrap();
        let second = host
            .create(&depositor, Identity::new("arb-2"), Identity::new("carol"), Amount::new(20))
            .unwrap();

        assert!(matches!(
            host.approve(&second, &FixedCaller::new("arb-1")),
            Err(EscrowError::NotAuthorized { .. })
        ));
        assert_eq!(host.approve(&first, &FixedCaller::new("arb-1")), Ok(Amount::new(10)));
        assert_eq!(host.balance(&first).unwrap(), Amount::ZERO);
        assert_eq!(host.balance(&second).unwrap(), Amount::new(20));
        assert_eq!(host.ledger().account_balance(&Identity::new("bob")), Amount::new(10));
    }

    #[test]
    fn host_applies_configured_policy() {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(&Identity::new("alice"), Amount::new(5)).unwrap();
        let mut host = EscrowHost::new(
            EscrowConfig::with_policy(ReleasePolicy::RejectAfterRelease),
            ledger,
            EventLog::new(),
        );
        let id = host
            .create(
                &FixedCaller::new("alice"),
                Identity::new("arbiter"),
                Identity::new("bob"),
                Amount::new(5),
            )
            .unwrap();
        let arbiter = FixedCaller::new("arbiter");
        assert_eq!(host.approve(&id, &arbiter), Ok(Amount::new(5)));
        assert_eq!(
            host.approve(&id, &arbiter),
            Err(EscrowError::AlreadyReleased { entry_id: id })
        );
    }

    #[test]
    fn parts_roundtrip_preserves_entries() {
        let mut host = host_with_funds(7);
        let id = host
            .create(
                &FixedCaller::new("alice"),
                Identity::new("arbiter"),
                Identity::new("bob"),
                Amount::new(7),
            )
            .unwrap();
        let config = host.config().clone();
        let (ledger, events, entries) = host.into_parts();
        let mut restored = EscrowHost::from_parts(config, ledger, events, entries);

        assert_eq!(restored.balance(&id).unwrap(), Amount::new(7));
        assert_eq!(restored.approve(&id, &FixedCaller::new("arbiter")), Ok(Amount::new(7)));
        assert_eq!(restored.events().approvals(&id), vec![Amount::new(7)]);
    }
}
