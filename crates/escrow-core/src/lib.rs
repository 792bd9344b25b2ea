#![deny(missing_docs)]

//! # escrow-core — Foundational Types for Arbiter Escrow
//!
//! This crate defines the domain primitives every other crate in the
//! workspace depends on. It has no internal crate dependencies — only
//! `serde`, `thiserror`, `chrono`, and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** A party [`Identity`] and an
//!    escrow [`EntryId`] are distinct types. You cannot pass one where the
//!    other is expected.
//!
//! 2. **[`Amount`] cannot go negative.** Amounts are unsigned smallest-unit
//!    integers and every arithmetic operation is checked.
//!
//! 3. **[`ValidationError`] for text input.** Parsing from strings (CLI
//!    arguments, config files) returns structured errors built with
//!    `thiserror` — no `.unwrap()` outside tests.

pub mod amount;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use amount::Amount;
pub use error::ValidationError;
pub use identity::{EntryId, Identity};
pub use temporal::Timestamp;
