//! # Validation Errors
//!
//! Errors raised when domain primitives are parsed from untrusted text.
//! Each variant carries the rejected input so operators can diagnose a bad
//! argument or config value without guesswork.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Amount is not a non-negative integer in smallest units.
    #[error("invalid amount: \"{0}\" (expected a non-negative integer in smallest units)")]
    InvalidAmount(String),

    /// Entry identifier is not a UUID, with or without the `escrow:` prefix.
    #[error("invalid escrow entry id: \"{0}\" (expected escrow:<uuid> or <uuid>)")]
    InvalidEntryId(String),

    /// Identity text was empty after trimming whitespace.
    #[error("identity must not be empty")]
    EmptyIdentity,
}
