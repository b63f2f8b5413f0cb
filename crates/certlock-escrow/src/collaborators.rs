//! Narrow interfaces to the two external collaborators.
//!
//! The escrow never reaches into either collaborator's internals: it moves
//! balances through [`BalanceHolder`] and mirrors lock status through
//! [`CredentialRegistry`].

use certlock_types::{AccountId, CertificateAttributes, CertificateId, Result};
use rust_decimal::Decimal;

/// The fungible balance holder.
///
/// Implementations report rejected transfers as
/// [`certlock_types::CertlockError::TransferFailed`] and leave balances
/// unchanged when they do.
pub trait BalanceHolder {
    /// Move `amount` from `from` to `to`, spending `spender`'s allowance.
    fn transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()>;

    /// Undo a prior `transfer_from(spender, from, to, amount)`: move `amount`
    /// back from `to` to `from` and restore `spender`'s allowance.
    fn reverse_transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()>;

    /// Move `amount` from `sender`'s own balance to `to`.
    fn transfer(&mut self, sender: AccountId, to: AccountId, amount: Decimal) -> Result<()>;

    fn balance_of(&self, account: AccountId) -> Decimal;
}

/// The credential registry holding certificates.
///
/// Implementations report failures as
/// [`certlock_types::CertlockError::RegistryFailed`].
pub trait CredentialRegistry {
    /// Create a certificate owned by `owner`.
    fn mint(&mut self, owner: AccountId, attributes: CertificateAttributes) -> Result<CertificateId>;

    fn set_attribute(&mut self, id: CertificateId, key: &str, value: &str) -> Result<()>;

    fn get_attribute(&self, id: CertificateId, key: &str) -> Option<String>;
}
