//! Shared harness for escrow integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use certlock_auth::TypedSigner;
use certlock_escrow::{
    BalanceHolder, CallContext, CredentialRegistry, EscrowService, InMemoryBalances,
    InMemoryRegistry,
};
use certlock_types::*;
use rust_decimal::Decimal;

pub const T0: Timestamp = Timestamp(1_700_000_000);
pub const CUSTODY: AccountId = AccountId([0xcc; 32]);
pub const ALICE: AccountId = AccountId([0xa1; 32]);
pub const BOB: AccountId = AccountId([0xb0; 32]);
pub const DAY: u64 = constants::SECS_PER_DAY;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn units(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

/// Escrow plus a deployer key and a movable clock.
pub struct Harness<B: BalanceHolder, R: CredentialRegistry> {
    pub escrow: EscrowService<B, R>,
    pub owner: TypedSigner,
    pub now: Timestamp,
}

pub type MemHarness = Harness<InMemoryBalances, InMemoryRegistry>;

impl MemHarness {
    pub fn new() -> Self {
        Self::with_config(EscrowConfig::default())
    }

    pub fn with_config(config: EscrowConfig) -> Self {
        Self::build(config, InMemoryBalances::new(), Some(InMemoryRegistry::new()))
    }

    /// Mint `amount` to `account` and approve custody to pull it.
    pub fn fund(&mut self, account: AccountId, amount: Decimal) {
        let balances = self.escrow.balances_mut();
        balances.mint(account, amount);
        balances.approve(account, CUSTODY, amount);
    }

    pub fn allowance(&self, account: AccountId) -> Decimal {
        self.escrow.balances().allowance(account, CUSTODY)
    }
}

impl<B: BalanceHolder, R: CredentialRegistry> Harness<B, R> {
    pub fn build(config: EscrowConfig, balances: B, registry: Option<R>) -> Self {
        init_tracing();
        let owner = TypedSigner::random();
        let escrow = EscrowService::new(config, CUSTODY, owner.account(), balances, registry)
            .expect("valid config");
        Self {
            escrow,
            owner,
            now: T0,
        }
    }

    pub fn ctx(&self, caller: AccountId) -> CallContext {
        CallContext::new(caller, self.now)
    }

    pub fn owner_ctx(&self) -> CallContext {
        self.ctx(self.owner.account())
    }

    pub fn advance(&mut self, secs: u64) {
        self.now = self.now.saturating_add_secs(secs);
    }

    /// A fresh deposit authorization signed by `signer`, valid for one day.
    pub fn deposit_auth_by(&self, signer: &TypedSigner) -> (DepositAuthorization, TypedSignature) {
        let auth = DepositAuthorization::dummy(signer.account(), self.now.saturating_add_secs(DAY));
        let sig = signer.sign(self.escrow.domain_separator(), &auth);
        (auth, sig)
    }

    pub fn deposit_auth(&self) -> (DepositAuthorization, TypedSignature) {
        self.deposit_auth_by(&self.owner)
    }

    /// A fresh release authorization for `account`, signed by the owner.
    pub fn release_auth(&self, account: AccountId) -> (ReleaseAuthorization, TypedSignature) {
        let auth =
            ReleaseAuthorization::dummy(account, self.owner.account(), self.now.saturating_add_secs(DAY));
        let sig = self.owner.sign(self.escrow.domain_separator(), &auth);
        (auth, sig)
    }

    pub fn lock(&mut self, caller: AccountId, amount: Decimal) -> Result<LockIndex> {
        let (auth, sig) = self.deposit_auth();
        let ctx = self.ctx(caller);
        self.escrow.lock(ctx, amount, &auth, &sig)
    }
}

// ---------------------------------------------------------------------------
// Fault-injecting collaborators
// ---------------------------------------------------------------------------

/// Switches shared between a test and the collaborators the escrow owns.
#[derive(Clone, Default)]
pub struct Faults {
    pub fail_mint: Rc<Cell<bool>>,
    pub fail_status: Rc<Cell<bool>>,
    pub fail_payout: Rc<Cell<bool>>,
}

pub struct FlakyBalances {
    pub inner: InMemoryBalances,
    pub faults: Faults,
}

impl BalanceHolder for FlakyBalances {
    fn transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        self.inner.transfer_from(spender, from, to, amount)
    }

    fn reverse_transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        self.inner.reverse_transfer_from(spender, from, to, amount)
    }

    fn transfer(&mut self, sender: AccountId, to: AccountId, amount: Decimal) -> Result<()> {
        if self.faults.fail_payout.get() {
            return Err(CertlockError::Internal("payout rejected".into()));
        }
        self.inner.transfer(sender, to, amount)
    }

    fn balance_of(&self, account: AccountId) -> Decimal {
        self.inner.balance_of(account)
    }
}

pub struct FlakyRegistry {
    pub inner: InMemoryRegistry,
    pub faults: Faults,
}

impl CredentialRegistry for FlakyRegistry {
    fn mint(&mut self, owner: AccountId, attributes: CertificateAttributes) -> Result<CertificateId> {
        if self.faults.fail_mint.get() {
            return Err(CertlockError::RegistryFailed {
                reason: "mint rejected".into(),
            });
        }
        self.inner.mint(owner, attributes)
    }

    fn set_attribute(&mut self, id: CertificateId, key: &str, value: &str) -> Result<()> {
        if self.faults.fail_status.get() {
            return Err(CertlockError::RegistryFailed {
                reason: "update rejected".into(),
            });
        }
        self.inner.set_attribute(id, key, value)
    }

    fn get_attribute(&self, id: CertificateId, key: &str) -> Option<String> {
        self.inner.get_attribute(id, key)
    }
}

pub type FlakyHarness = Harness<FlakyBalances, FlakyRegistry>;

impl FlakyHarness {
    pub fn flaky(config: EscrowConfig) -> (Self, Faults) {
        let faults = Faults::default();
        let balances = FlakyBalances {
            inner: InMemoryBalances::new(),
            faults: faults.clone(),
        };
        let registry = FlakyRegistry {
            inner: InMemoryRegistry::new(),
            faults: faults.clone(),
        };
        (Self::build(config, balances, Some(registry)), faults)
    }

    pub fn fund(&mut self, account: AccountId, amount: Decimal) {
        let balances = &mut self.escrow.balances_mut().inner;
        balances.mint(account, amount);
        balances.approve(account, CUSTODY, amount);
    }

    pub fn allowance(&self, account: AccountId) -> Decimal {
        self.escrow.balances().inner.allowance(account, CUSTODY)
    }
}
