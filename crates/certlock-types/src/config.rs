//! Deployment configuration, fixed at initialization.

use serde::{Deserialize, Serialize};

use crate::{CertlockError, Result, Role, constants};

/// How locks are released in a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseMode {
    /// The owner unlocks once the release policy allows it.
    #[default]
    Elapsed,
    /// Unlock additionally requires a signed release authorization.
    Signed,
}

impl std::fmt::Display for ReleaseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Elapsed => write!(f, "elapsed"),
            Self::Signed => write!(f, "signed"),
        }
    }
}

/// Configuration for one escrow instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscrowConfig {
    /// Protocol name bound into the domain separator.
    pub protocol_name: String,
    /// Protocol version bound into the domain separator.
    pub protocol_version: String,
    /// Execution-context identifier bound into the domain separator.
    pub chain_id: u64,
    /// Seconds after which any lock is releasable.
    pub default_lock_period: u64,
    /// Seconds after which a lock flagged for early withdrawal is releasable.
    pub early_lock_period: u64,
    /// Role a deposit authorization's signer must hold.
    pub deposit_signer_role: Role,
    /// Role a release authorization's signer must hold.
    pub release_signer_role: Role,
    /// Which unlock variant this deployment accepts.
    pub release_mode: ReleaseMode,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            protocol_name: constants::DEFAULT_PROTOCOL_NAME.to_string(),
            protocol_version: constants::DEFAULT_PROTOCOL_VERSION.to_string(),
            chain_id: constants::DEFAULT_CHAIN_ID,
            default_lock_period: constants::DEFAULT_LOCK_PERIOD_SECS,
            early_lock_period: constants::DEFAULT_EARLY_LOCK_PERIOD_SECS,
            deposit_signer_role: Role::Operator,
            release_signer_role: Role::Operator,
            release_mode: ReleaseMode::Elapsed,
        }
    }
}

impl EscrowConfig {
    /// Check the invariants the escrow relies on.
    pub fn validate(&self) -> Result<()> {
        if self.protocol_name.is_empty() {
            return Err(CertlockError::Configuration(
                "protocol_name must not be empty".into(),
            ));
        }
        if self.protocol_version.is_empty() {
            return Err(CertlockError::Configuration(
                "protocol_version must not be empty".into(),
            ));
        }
        validate_periods(self.default_lock_period, self.early_lock_period)
    }
}

/// `early <= default` must hold for the early-withdrawal override to mean
/// anything.
pub fn validate_periods(default_lock_period: u64, early_lock_period: u64) -> Result<()> {
    if early_lock_period > default_lock_period {
        return Err(CertlockError::Configuration(format!(
            "early_lock_period ({early_lock_period}s) exceeds default_lock_period ({default_lock_period}s)"
        )));
    }
    Ok(())
}
