//! # Identity Oracle
//!
//! The escrow never takes "who is calling" as an ordinary argument. The
//! hosting environment resolves the caller and hands the escrow an
//! [`IdentityOracle`]; the escrow asks it once per invocation.

use escrow_core::Identity;

/// Resolves the identity of the party making the current invocation.
///
/// Implementations must be forgery-proof from the escrow's point of view:
/// whatever identity they report is trusted for the authorization check.
pub trait IdentityOracle {
    /// The identity of the current caller.
    fn caller(&self) -> Identity;
}

/// An oracle that always reports the same caller.
///
/// Suitable for tests and for front-ends that have already authenticated
/// the caller before reaching the escrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCaller(Identity);

impl FixedCaller {
    /// Report `identity` as the caller.
    pub fn new(identity: impl Into<Identity>) -> Self {
        Self(identity.into())
    }
}

impl IdentityOracle for FixedCaller {
    fn caller(&self) -> Identity {
        self.0.clone()
    }
}
