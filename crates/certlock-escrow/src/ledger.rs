//! Lock ledger — append-only, per-account ordered lock records.
//!
//! Indices are positions in the account's sequence: 0-based, monotonic,
//! never reused. Records are never deleted; released ones stay for audit.

use std::collections::HashMap;

use certlock_types::{
    AccountId, CertificateId, CertlockError, LockIndex, LockRecord, LockState, Result, Timestamp,
};
use rust_decimal::Decimal;

/// Every account's locks, in creation order.
#[derive(Debug, Default)]
pub struct LockLedger {
    locks: HashMap<AccountId, Vec<LockRecord>>,
}

impl LockLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an unreleased record and return its index.
    pub fn create_lock(
        &mut self,
        account: AccountId,
        amount: Decimal,
        locked_at: Timestamp,
        certificate_id: Option<CertificateId>,
    ) -> LockIndex {
        let records = self.locks.entry(account).or_default();
        records.push(LockRecord::new(amount, locked_at, certificate_id));
        records.len() - 1
    }

    /// Index the next [`LockLedger::create_lock`] for `account` will return.
    #[must_use]
    pub fn next_index(&self, account: AccountId) -> LockIndex {
        self.lock_count(account)
    }

    pub fn get_lock(&self, account: AccountId, index: LockIndex) -> Result<&LockRecord> {
        self.locks
            .get(&account)
            .and_then(|records| records.get(index))
            .ok_or(CertlockError::LockNotFound { account, index })
    }

    /// The most recent record for `account`.
    pub fn get_last_lock(&self, account: AccountId) -> Result<&LockRecord> {
        self.locks
            .get(&account)
            .and_then(|records| records.last())
            .ok_or(CertlockError::NoLocksFound(account))
    }

    /// All records for `account`, oldest first.
    #[must_use]
    pub fn locks_of(&self, account: AccountId) -> &[LockRecord] {
        self.locks.get(&account).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn lock_count(&self, account: AccountId) -> usize {
        self.locks.get(&account).map_or(0, Vec::len)
    }

    /// Set the early-withdrawal flag of exactly one unreleased record.
    pub fn set_early_withdrawal(
        &mut self,
        account: AccountId,
        index: LockIndex,
        allowed: bool,
    ) -> Result<()> {
        let record = self.unreleased_mut(account, index)?;
        record.early_withdrawal_allowed = allowed;
        Ok(())
    }

    /// Transition a record to RELEASED.
    ///
    /// # Errors
    /// `LockNotFound` on a bad index, `AlreadyReleased` if it was released.
    pub fn mark_released(&mut self, account: AccountId, index: LockIndex) -> Result<()> {
        let record = self.unreleased_mut(account, index)?;
        debug_assert!(record.state().can_transition_to(LockState::Released));
        record.released = true;
        Ok(())
    }

    fn unreleased_mut(&mut self, account: AccountId, index: LockIndex) -> Result<&mut LockRecord> {
        let record = self
            .locks
            .get_mut(&account)
            .and_then(|records| records.get_mut(index))
            .ok_or(CertlockError::LockNotFound { account, index })?;
        if record.is_released() {
            return Err(CertlockError::AlreadyReleased { account, index });
        }
        Ok(record)
    }
}
