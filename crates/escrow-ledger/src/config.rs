//! Escrow configuration.
//!
//! The only tunable is the [`ReleasePolicy`], which decides what an approval
//! by the arbiter does once an entry has already been released. Defaults
//! reproduce the permissive behavior: a repeat approval moves whatever is
//! left in custody (normally zero) and succeeds.
//!
//! Load from the environment with [`EscrowConfig::from_env`] or from a YAML
//! file with [`EscrowConfig::from_yaml_file`].

use std::env::VarError;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Environment variable read by [`EscrowConfig::from_env`].
pub const RELEASE_POLICY_ENV: &str = "ESCROW_RELEASE_POLICY";

/// Behavior of `approve()` on an entry that has already been released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleasePolicy {
    /// Repeat approvals transfer the live balance and emit `Approved(0)`.
    #[default]
    AllowReapproval,
    /// Repeat approvals by the arbiter fail with `AlreadyReleased`.
    RejectAfterRelease,
}

impl ReleasePolicy {
    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllowReapproval => "allow_reapproval",
            Self::RejectAfterRelease => "reject_after_release",
        }
    }
}

impl std::fmt::Display for ReleasePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleasePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allow_reapproval" => Ok(Self::AllowReapproval),
            "reject_after_release" => Ok(Self::RejectAfterRelease),
            other => Err(ConfigError::InvalidPolicy(other.to_string())),
        }
    }
}

/// Escrow behavior settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EscrowConfig {
    /// What a post-release approval does.
    pub release_policy: ReleasePolicy,
}

impl EscrowConfig {
    /// Configuration with an explicit release policy.
    pub fn with_policy(release_policy: ReleasePolicy) -> Self {
        Self { release_policy }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ESCROW_RELEASE_POLICY` (default: `allow_reapproval`)
    ///
    /// A set but unparseable value, including one that is not valid
    /// UTF-8, is an error rather than the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(RELEASE_POLICY_ENV) {
            Ok(raw) => Ok(Self::with_policy(raw.trim().parse()?)),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(raw)) => Err(ConfigError::InvalidPolicy(
                raw.to_string_lossy().into_owned(),
            )),
        }
    }

    /// Parse configuration from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML configuration file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The release policy name is not recognized.
    #[error("invalid release policy \"{0}\" (expected allow_reapproval or reject_after_release)")]
    InvalidPolicy(String),
    /// The configuration file could not be read.
    #[error("cannot read config file {}: {source}", .path.display())]
    Io {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying read failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration document is not valid YAML or has unknown fields.
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
