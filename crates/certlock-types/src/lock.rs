//! # LockRecord — one custody entry per deposit
//!
//! ## State Machine
//!
//! ```text
//!   ┌─────────┐  release policy approves + payout succeeds  ┌──────────┐
//!   │ CREATED ├────────────────────────────────────────────▶│ RELEASED │
//!   └─────────┘                                             └──────────┘
//! ```
//!
//! `RELEASED` is terminal: the record stays in the ledger for audit but is
//! never mutated again.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CertificateId, Timestamp};

/// Lifecycle state of a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockState {
    /// Funds are in custody.
    Created,
    /// Funds were paid back. **Irreversible.**
    Released,
}

impl LockState {
    /// Can this lock transition to the given target state?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Created, Self::Released))
    }
}

impl std::fmt::Display for LockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::Released => write!(f, "RELEASED"),
        }
    }
}

/// A single lock held on behalf of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// Quantity held in custody. Always positive.
    pub amount: Decimal,
    /// When the lock was created.
    pub locked_at: Timestamp,
    /// Set by an operator to allow release after the early period.
    pub early_withdrawal_allowed: bool,
    /// Set once the amount has been paid back.
    pub released: bool,
    /// Certificate minted alongside the lock, if a registry was attached.
    pub certificate_id: Option<CertificateId>,
}

impl LockRecord {
    /// A fresh, unreleased record.
    #[must_use]
    pub fn new(amount: Decimal, locked_at: Timestamp, certificate_id: Option<CertificateId>) -> Self {
        Self {
            amount,
            locked_at,
            early_withdrawal_allowed: false,
            released: false,
            certificate_id,
        }
    }

    #[must_use]
    pub fn state(&self) -> LockState {
        if self.released {
            LockState::Released
        } else {
            LockState::Created
        }
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Earliest time at which the record becomes releasable under the given
    /// periods, taking the early-withdrawal flag into account.
    #[must_use]
    pub fn releasable_at(&self, default_period: u64, early_period: u64) -> Timestamp {
        let by_default = self.locked_at.saturating_add_secs(default_period);
        if self.early_withdrawal_allowed {
            by_default.min(self.locked_at.saturating_add_secs(early_period))
        } else {
            by_default
        }
    }
}

/// Dummy record for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl LockRecord {
    pub fn dummy(amount: i64, locked_at: u64) -> Self {
        Self::new(Decimal::new(amount, 0), Timestamp(locked_at), None)
    }
}
