//! Release policy — decides when a lock may be paid back.
//!
//! A record is releasable once `now >= locked_at + default_period`, or, when
//! an operator flagged it for early withdrawal, once
//! `now >= locked_at + early_period`.

use certlock_types::{CertlockError, LockRecord, Result, Timestamp, validate_periods};

/// Stateless release eligibility check.
#[must_use]
pub fn can_release(record: &LockRecord, now: Timestamp, default_period: u64, early_period: u64) -> bool {
    now >= record.locked_at.saturating_add_secs(default_period)
        || (record.early_withdrawal_allowed
            && now >= record.locked_at.saturating_add_secs(early_period))
}

/// The configured lock periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleasePolicy {
    default_period: u64,
    early_period: u64,
}

impl ReleasePolicy {
    /// # Errors
    /// `Configuration` if `early_period > default_period`.
    pub fn new(default_period: u64, early_period: u64) -> Result<Self> {
        validate_periods(default_period, early_period)?;
        Ok(Self {
            default_period,
            early_period,
        })
    }

    #[must_use]
    pub fn default_period(&self) -> u64 {
        self.default_period
    }

    #[must_use]
    pub fn early_period(&self) -> u64 {
        self.early_period
    }

    #[must_use]
    pub fn can_release(&self, record: &LockRecord, now: Timestamp) -> bool {
        can_release(record, now, self.default_period, self.early_period)
    }

    /// Fail with `InLockPeriod` unless `record` is releasable at `now`.
    pub fn check(&self, record: &LockRecord, now: Timestamp) -> Result<()> {
        if self.can_release(record, now) {
            Ok(())
        } else {
            Err(CertlockError::InLockPeriod {
                releasable_at: record.releasable_at(self.default_period, self.early_period),
            })
        }
    }
}
