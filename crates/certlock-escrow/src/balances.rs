//! In-memory balance holder.
//!
//! Per-account balances with owner → spender allowances. All mutations are
//! atomic: either the full transfer succeeds or nothing changes.

use std::collections::HashMap;

use certlock_types::{AccountId, CertlockError, Result};
use rust_decimal::Decimal;

use crate::collaborators::BalanceHolder;

/// Reference [`BalanceHolder`] used by tests and local deployments.
#[derive(Debug, Default)]
pub struct InMemoryBalances {
    balances: HashMap<AccountId, Decimal>,
    /// `(owner, spender)` → remaining allowance.
    allowances: HashMap<(AccountId, AccountId), Decimal>,
}

impl InMemoryBalances {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create new supply in `account`.
    pub fn mint(&mut self, account: AccountId, amount: Decimal) {
        *self.balances.entry(account).or_default() += amount;
    }

    /// Set the amount `spender` may move out of `owner`'s balance.
    pub fn approve(&mut self, owner: AccountId, spender: AccountId, amount: Decimal) {
        self.allowances.insert((owner, spender), amount);
    }

    #[must_use]
    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Decimal {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Sum of every account's balance.
    #[must_use]
    pub fn total_supply(&self) -> Decimal {
        self.balances.values().copied().sum()
    }

    fn move_balance(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(CertlockError::TransferFailed {
                reason: format!("non-positive amount {amount}"),
            });
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(CertlockError::TransferFailed {
                reason: format!("insufficient balance: need {amount}, have {available}"),
            });
        }
        *self.balances.entry(from).or_default() -= amount;
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }
}

impl BalanceHolder for InMemoryBalances {
    fn transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(CertlockError::TransferFailed {
                reason: format!("insufficient allowance: need {amount}, have {allowed}"),
            });
        }
        self.move_balance(from, to, amount)?;
        self.allowances.insert((from, spender), allowed - amount);
        Ok(())
    }

    fn reverse_transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        self.move_balance(to, from, amount)?;
        *self.allowances.entry((from, spender)).or_default() += amount;
        Ok(())
    }

    fn transfer(&mut self, sender: AccountId, to: AccountId, amount: Decimal) -> Result<()> {
        self.move_balance(sender, to, amount)
    }

    fn balance_of(&self, account: AccountId) -> Decimal {
        self.balances.get(&account).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: AccountId = AccountId([1u8; 32]);
    const BOB: AccountId = AccountId([2u8; 32]);
    const VAULT: AccountId = AccountId([3u8; 32]);

    #[test]
    fn mint_increases_balance() {
        let mut b = InMemoryBalances::new();
        b.mint(ALICE, Decimal::new(200, 0));
        assert_eq!(b.balance_of(ALICE), Decimal::new(200, 0));
        assert_eq!(b.total_supply(), Decimal::new(200, 0));
    }

    #[test]
    fn transfer_moves_funds() {
        let mut b = InMemoryBalances::new();
        b.mint(ALICE, Decimal::new(200, 0));
        b.transfer(ALICE, BOB, Decimal::new(50, 0)).unwrap();
        assert_eq!(b.balance_of(ALICE), Decimal::new(150, 0));
        assert_eq!(b.balance_of(BOB), Decimal::new(50, 0));
    }

    #[test]
    fn transfer_insufficient_fails_unchanged() {
        let mut b = InMemoryBalances::new();
        b.mint(ALICE, Decimal::new(10, 0));
        let err = b.transfer(ALICE, BOB, Decimal::new(11, 0)).unwrap_err();
        assert!(matches!(err, CertlockError::TransferFailed { .. }));
        assert_eq!(b.balance_of(ALICE), Decimal::new(10, 0));
        assert_eq!(b.balance_of(BOB), Decimal::ZERO);
    }

    #[test]
    fn transfer_from_spends_allowance() {
        let mut b = InMemoryBalances::new();
        b.mint(ALICE, Decimal::new(200, 0));
        b.approve(ALICE, VAULT, Decimal::new(100, 0));
        b.transfer_from(VAULT, ALICE, VAULT, Decimal::new(60, 0)).unwrap();
        assert_eq!(b.allowance(ALICE, VAULT), Decimal::new(40, 0));
        assert_eq!(b.balance_of(VAULT), Decimal::new(60, 0));

        let err = b
            .transfer_from(VAULT, ALICE, VAULT, Decimal::new(41, 0))
            .unwrap_err();
        assert!(matches!(err, CertlockError::TransferFailed { .. }));
        assert_eq!(b.balance_of(ALICE), Decimal::new(140, 0));
    }

    #[test]
    fn transfer_from_without_balance_keeps_allowance() {
        let mut b = InMemoryBalances::new();
        b.approve(ALICE, VAULT, Decimal::new(100, 0));
        assert!(b.transfer_from(VAULT, ALICE, VAULT, Decimal::ONE).is_err());
        assert_eq!(b.allowance(ALICE, VAULT), Decimal::new(100, 0));
    }

    #[test]
    fn reverse_transfer_from_restores_allowance() {
        let mut b = InMemoryBalances::new();
        b.mint(ALICE, Decimal::new(100, 0));
        b.approve(ALICE, VAULT, Decimal::new(100, 0));
        b.transfer_from(VAULT, ALICE, VAULT, Decimal::new(100, 0)).unwrap();
        assert_eq!(b.allowance(ALICE, VAULT), Decimal::ZERO);

        b.reverse_transfer_from(VAULT, ALICE, VAULT, Decimal::new(100, 0))
            .unwrap();
        assert_eq!(b.allowance(ALICE, VAULT), Decimal::new(100, 0));
        assert_eq!(b.balance_of(ALICE), Decimal::new(100, 0));
        assert_eq!(b.balance_of(VAULT), Decimal::ZERO);
    }

    #[test]
    fn reverse_without_custody_funds_fails_unchanged() {
        let mut b = InMemoryBalances::new();
        b.approve(ALICE, VAULT, Decimal::new(5, 0));
        let err = b
            .reverse_transfer_from(VAULT, ALICE, VAULT, Decimal::new(10, 0))
            .unwrap_err();
        assert!(matches!(err, CertlockError::TransferFailed { .. }));
        assert_eq!(b.allowance(ALICE, VAULT), Decimal::new(5, 0));
    }

    #[test]
    fn unknown_account_is_zero() {
        let b = InMemoryBalances::new();
        assert_eq!(b.balance_of(BOB), Decimal::ZERO);
    }
}
