//! # Escrow Events
//!
//! Notifications observable by external watchers. An `Approved` event is
//! emitted only after the value-transfer primitive has confirmed the
//! release, and never on a failed or unauthorized attempt.
//!
//! Sinks are infallible: once the transfer has succeeded the release is
//! final, so there is no failure a sink could meaningfully report back.

use escrow_core::{Amount, EntryId, Identity, Timestamp};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// What happened to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// An entry was created and funded.
    Created {
        /// Party that funded the entry.
        depositor: Identity,
        /// Party authorized to release.
        arbiter: Identity,
        /// Party eligible to receive.
        beneficiary: Identity,
        /// Amount placed in custody at creation.
        funded: Amount,
    },
    /// The arbiter released the custodied value to the beneficiary.
    Approved {
        /// The exact amount moved.
        amount: Amount,
    },
}

/// A single notification about one escrow entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowEvent {
    /// The entry concerned.
    pub entry_id: EntryId,
    /// When the event was recorded.
    pub recorded_at: Timestamp,
    /// The event payload.
    #[serde(flatten)]
    pub kind: EventKind,
}

impl EscrowEvent {
    /// A creation event stamped with the current time.
    pub fn created(
        entry_id: EntryId,
        depositor: Identity,
        arbiter: Identity,
        beneficiary: Identity,
        funded: Amount,
    ) -> Self {
        Self {
            entry_id,
            recorded_at: Timestamp::now(),
            kind: EventKind::Created {
                depositor,
                arbiter,
                beneficiary,
                funded,
            },
        }
    }

    /// A release event stamped with the current time.
    pub fn approved(entry_id: EntryId, amount: Amount) -> Self {
        Self {
            entry_id,
            recorded_at: Timestamp::now(),
            kind: EventKind::Approved { amount },
        }
    }

    /// The released amount, if this is an `Approved` event.
    pub fn approved_amount(&self) -> Option<Amount> {
        match self.kind {
            EventKind::Approved { amount } => Some(amount),
            EventKind::Created { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Receives events as they are emitted.
pub trait EventSink {
    /// Record one event.
    fn emit(&mut self, event: EscrowEvent);
}

/// Append-only in-memory event log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<EscrowEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in emission order.
    pub fn events(&self) -> &[EscrowEvent] {
        &self.events
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no event has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events concerning one entry, in emission order.
    pub fn for_entry<'a>(&'a self, entry_id: &'a EntryId) -> impl Iterator<Item = &'a EscrowEvent> {
        self.events.iter().filter(move |e| &e.entry_id == entry_id)
    }

    /// Released amounts for one entry, in emission order.
    pub fn approvals(&self, entry_id: &EntryId) -> Vec<Amount> {
        self.for_entry(entry_id)
            .filter_map(EscrowEvent::approved_amount)
            .collect()
    }

    /// Render the log as newline-delimited JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if an event fails to
    /// serialize.
    pub fn to_json_lines(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&serde_json::to_string(event)?);
            out.push('\n');
        }
        Ok(out)
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: EscrowEvent) {
        tracing::debug!(entry_id = %event.entry_id, kind = ?event.kind, "event recorded");
        self.events.push(event);
    }
}
