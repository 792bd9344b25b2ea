//! # Simulation State File
//!
//! Everything the simulation knows lives in one JSON document: the
//! in-memory ledger, the escrow entries, and the event log. Commands load
//! it, act, and save it back only when they succeed.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use escrow_ledger::{EscrowConfig, EscrowEntry, EscrowHost, EventLog, InMemoryLedger};

/// Persisted simulation state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Account and custody balances.
    pub ledger: InMemoryLedger,
    /// Every entry ever created.
    pub entries: Vec<EscrowEntry>,
    /// Every notification ever emitted.
    pub events: EventLog,
}

impl SimulationState {
    /// Load state from `path`, or start empty if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no state file, starting empty");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read state file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("state file {} is not valid", path.display()))
    }

    /// Write state to `path`, replacing the previous file in one rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("failed to replace state file {}", path.display()))?;
        Ok(())
    }

    /// Build a host over this state.
    pub fn into_host(self, config: EscrowConfig) -> EscrowHost<InMemoryLedger, EventLog> {
        EscrowHost::from_parts(config, self.ledger, self.events, self.entries)
    }

    /// Capture a host's state for saving.
    pub fn from_host(host: EscrowHost<InMemoryLedger, EventLog>) -> Self {
        let (ledger, events, entries) = host.into_parts();
        Self {
            ledger,
            entries,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escrow_core::{Amount, Identity};
    use escrow_ledger::FixedCaller;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let state = SimulationState::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(state, SimulationState::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut state = SimulationState::default();
        state.ledger.mint(&Identity::new("alice"), Amount::new(50)).unwrap();
        let mut host = state.into_host(EscrowConfig::default());
        host.create(
            &FixedCaller::new("alice"),
            Identity::new("arb"),
            Identity::new("bob"),
            Amount::new(50),
        )
        .unwrap();
        let state = SimulationState::from_host(host);
        state.save(&path).unwrap();

        let loaded = SimulationState::load(&path).unwrap();
        assert_eq!(loaded, state);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = SimulationState::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("not valid"));
    }
}
