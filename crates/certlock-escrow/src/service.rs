//! Escrow service — the lock/unlock entry points.
//!
//! The service composes the authorization verifier, lock ledger, release
//! policy, and access guard, and drives the two external collaborators.
//!
//! ## Atomicity
//!
//! Every entry point either commits all of its effects or none. Internal
//! state is only written after every fallible step succeeded; external
//! effects are ordered so a later failure can be undone through the
//! collaborator interfaces:
//!
//! ```text
//! lock:   check ─▶ transfer_from ─▶ mint ──(fail: refund)──▶ consume token ─▶ append ─▶ Locked
//! unlock: check ─▶ status=COMPLETE ─▶ payout ──(fail: status=ACTIVE)──▶ consume token ─▶ release ─▶ Unlocked
//! ```

use certlock_auth::{AuthorizationVerifier, Authorized, DomainSeparator};
use certlock_types::{
    AccountId, AuthorizationToken, CertificateId, CertificateStatus, CertlockError,
    DepositAuthorization, EscrowConfig, EscrowEvent, LockIndex, LockRecord, ReleaseAuthorization,
    ReleaseMode, Result, Role, Timestamp, TypedSignature, attr, deposit_attributes,
    validate_periods,
};
use rust_decimal::Decimal;

use crate::access::AccessGuard;
use crate::collaborators::{BalanceHolder, CredentialRegistry};
use crate::ledger::LockLedger;
use crate::policy::ReleasePolicy;

/// Who is calling and when. Time is an input, never read from a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: AccountId,
    pub now: Timestamp,
}

impl CallContext {
    #[must_use]
    pub fn new(caller: AccountId, now: Timestamp) -> Self {
        Self { caller, now }
    }
}

/// Custodial escrow instance.
///
/// `B` holds the fungible balance; `R` is the credential registry, which may
/// be attached after initialization.
pub struct EscrowService<B, R> {
    /// This instance's own identity; holds custody balances.
    custody: AccountId,
    config: EscrowConfig,
    verifier: AuthorizationVerifier,
    ledger: LockLedger,
    policy: ReleasePolicy,
    access: AccessGuard,
    balances: B,
    registry: Option<R>,
    events: Vec<EscrowEvent>,
}

impl<B: BalanceHolder, R: CredentialRegistry> EscrowService<B, R> {
    /// Initialize an instance.
    ///
    /// `custody` is the service's own identity: it is bound into the domain
    /// separator and holds locked balances. `deployer` receives every role;
    /// `custody` receives MINTER so the instance may mint certificates.
    ///
    /// # Errors
    /// `Configuration` if `config` fails validation or `custody` is zero.
    pub fn new(
        config: EscrowConfig,
        custody: AccountId,
        deployer: AccountId,
        balances: B,
        registry: Option<R>,
    ) -> Result<Self> {
        config.validate()?;
        if custody.is_zero() {
            return Err(CertlockError::Configuration(
                "custody account must not be zero".into(),
            ));
        }

        let domain = DomainSeparator::compute(
            &config.protocol_name,
            &config.protocol_version,
            config.chain_id,
            &custody,
        );
        let policy = ReleasePolicy::new(config.default_lock_period, config.early_lock_period)?;
        let mut access = AccessGuard::bootstrap(deployer);
        access.grant(Role::Minter, custody);

        tracing::info!(
            custody = %custody,
            deployer = %deployer,
            domain = %domain,
            release_mode = %config.release_mode,
            registry = registry.is_some(),
            "Escrow initialized"
        );

        Ok(Self {
            custody,
            verifier: AuthorizationVerifier::new(domain),
            ledger: LockLedger::new(),
            policy,
            access,
            balances,
            registry,
            events: Vec::new(),
            config,
        })
    }

    // =================================================================
    // Lock / unlock
    // =================================================================

    /// Lock `amount` of the caller's balance under a signed deposit
    /// authorization, minting an ACTIVE certificate when a registry is
    /// attached.
    ///
    /// # Errors
    /// `ContractPaused`, `InvalidAmount`, any authorization error,
    /// `Unauthorized` if a registry is attached and the custody identity no
    /// longer holds MINTER, `TransferFailed`, `RegistryFailed`. On error
    /// nothing is retained.
    pub fn lock(
        &mut self,
        ctx: CallContext,
        amount: Decimal,
        auth: &DepositAuthorization,
        sig: &TypedSignature,
    ) -> Result<LockIndex> {
        self.access.require_not_paused()?;
        if amount <= Decimal::ZERO {
            return Err(CertlockError::InvalidAmount(amount));
        }

        let signer_role = self.config.deposit_signer_role;
        let access = &self.access;
        let proof = self
            .verifier
            .authorize(auth, sig, ctx.now, |s| access.has_role(s, signer_role))?;

        if self.registry.is_some() {
            self.access.require_role(self.custody, Role::Minter)?;
        }

        let account = ctx.caller;
        let index = self.ledger.next_index(account);

        self.balances
            .transfer_from(self.custody, account, self.custody, amount)
            .map_err(into_transfer_failed)?;

        let certificate_id = match self.mint_certificate(account, auth, amount, index) {
            Ok(id) => id,
            Err(err) => {
                self.refund(account, amount);
                return Err(err);
            }
        };

        self.commit_authorization(proof, ctx.now)?;
        let created = self
            .ledger
            .create_lock(account, amount, ctx.now, certificate_id);
        debug_assert_eq!(created, index);

        tracing::info!(
            account = %account,
            index,
            amount = %amount,
            certificate = ?certificate_id,
            "Locked"
        );
        self.events.push(EscrowEvent::Locked {
            account,
            lock_index: index,
            amount,
            certificate_id,
        });
        Ok(index)
    }

    /// Release the caller's lock at `index` once the release policy allows it.
    ///
    /// Only accepted when the deployment's release mode is
    /// [`ReleaseMode::Elapsed`]. Returns the amount paid back.
    pub fn unlock(&mut self, ctx: CallContext, index: LockIndex) -> Result<Decimal> {
        self.access.require_not_paused()?;
        self.require_release_mode(ReleaseMode::Elapsed)?;
        self.release(ctx, index, None)
    }

    /// Release the caller's lock at `index` with a signed release
    /// authorization, once the release policy allows it.
    ///
    /// Only accepted when the deployment's release mode is
    /// [`ReleaseMode::Signed`]. Returns the amount paid back.
    pub fn unlock_signed(
        &mut self,
        ctx: CallContext,
        index: LockIndex,
        auth: &ReleaseAuthorization,
        sig: &TypedSignature,
    ) -> Result<Decimal> {
        self.access.require_not_paused()?;
        self.require_release_mode(ReleaseMode::Signed)?;
        self.release(ctx, index, Some((auth, sig)))
    }

    fn release(
        &mut self,
        ctx: CallContext,
        index: LockIndex,
        authorization: Option<(&ReleaseAuthorization, &TypedSignature)>,
    ) -> Result<Decimal> {
        let account = ctx.caller;
        let record = self.ledger.get_lock(account, index)?;
        if record.is_released() {
            return Err(CertlockError::AlreadyReleased { account, index });
        }
        let amount = record.amount;
        let certificate_id = record.certificate_id;

        let proof = match authorization {
            Some((auth, sig)) => {
                if auth.account != account {
                    return Err(CertlockError::AuthorizationTargetMismatch {
                        target: auth.account,
                        caller: account,
                    });
                }
                let signer_role = self.config.release_signer_role;
                let access = &self.access;
                Some(
                    self.verifier
                        .authorize(auth, sig, ctx.now, |s| access.has_role(s, signer_role))?,
                )
            }
            None => None,
        };

        self.policy.check(record, ctx.now)?;

        if let Some(id) = certificate_id {
            self.set_certificate_status(id, CertificateStatus::Complete)?;
        }

        if let Err(err) = self.balances.transfer(self.custody, account, amount) {
            if let Some(id) = certificate_id {
                if let Err(restore) = self.set_certificate_status(id, CertificateStatus::Active) {
                    tracing::error!(
                        certificate = %id,
                        error = %restore,
                        "Failed to restore certificate status after payout failure"
                    );
                }
            }
            return Err(into_transfer_failed(err));
        }

        if let Some(proof) = proof {
            self.commit_authorization(proof, ctx.now)?;
        }
        self.ledger.mark_released(account, index)?;

        tracing::info!(account = %account, index, amount = %amount, "Unlocked");
        self.events.push(EscrowEvent::Unlocked {
            account,
            lock_index: index,
            amount,
        });
        Ok(amount)
    }

    // =================================================================
    // Administration
    // =================================================================

    /// Allow or disallow early withdrawal of exactly one lock. OPERATOR-only.
    pub fn set_early_withdrawal(
        &mut self,
        ctx: CallContext,
        account: AccountId,
        index: LockIndex,
        allowed: bool,
    ) -> Result<()> {
        self.access.require_role(ctx.caller, Role::Operator)?;
        self.ledger.set_early_withdrawal(account, index, allowed)?;

        tracing::info!(
            operator = %ctx.caller,
            account = %account,
            index,
            allowed,
            "Early withdrawal updated"
        );
        self.events.push(EscrowEvent::EarlyWithdrawalSet {
            account,
            lock_index: index,
            allowed,
        });
        Ok(())
    }

    /// Set the pause flag. PAUSER-only; pausing twice is not an error.
    pub fn pause(&mut self, ctx: CallContext) -> Result<()> {
        self.access.require_role(ctx.caller, Role::Pauser)?;
        if self.access.pause() {
            tracing::warn!(by = %ctx.caller, "Escrow paused");
            self.events.push(EscrowEvent::Paused { by: ctx.caller });
        }
        Ok(())
    }

    /// Clear the pause flag. PAUSER-only; unpausing twice is not an error.
    pub fn unpause(&mut self, ctx: CallContext) -> Result<()> {
        self.access.require_role(ctx.caller, Role::Pauser)?;
        if self.access.unpause() {
            tracing::info!(by = %ctx.caller, "Escrow unpaused");
            self.events.push(EscrowEvent::Unpaused { by: ctx.caller });
        }
        Ok(())
    }

    /// Add `account` to `role`. DEFAULT_ADMIN-only.
    pub fn grant_role(&mut self, ctx: CallContext, role: Role, account: AccountId) -> Result<()> {
        self.access.require_role(ctx.caller, Role::DefaultAdmin)?;
        if self.access.grant(role, account) {
            tracing::info!(%role, account = %account, by = %ctx.caller, "Role granted");
            self.events.push(EscrowEvent::RoleGranted {
                role,
                account,
                by: ctx.caller,
            });
        }
        Ok(())
    }

    /// Remove `account` from `role`. DEFAULT_ADMIN-only.
    pub fn revoke_role(&mut self, ctx: CallContext, role: Role, account: AccountId) -> Result<()> {
        self.access.require_role(ctx.caller, Role::DefaultAdmin)?;
        if self.access.revoke(role, account) {
            tracing::info!(%role, account = %account, by = %ctx.caller, "Role revoked");
            self.events.push(EscrowEvent::RoleRevoked {
                role,
                account,
                by: ctx.caller,
            });
        }
        Ok(())
    }

    /// Replace both lock periods. DEFAULT_ADMIN-only. Applies to existing
    /// locks as well, since eligibility is evaluated at unlock time.
    pub fn set_lock_periods(
        &mut self,
        ctx: CallContext,
        default_lock_period: u64,
        early_lock_period: u64,
    ) -> Result<()> {
        self.access.require_role(ctx.caller, Role::DefaultAdmin)?;
        validate_periods(default_lock_period, early_lock_period)?;
        self.policy = ReleasePolicy::new(default_lock_period, early_lock_period)?;
        self.config.default_lock_period = default_lock_period;
        self.config.early_lock_period = early_lock_period;

        tracing::info!(default_lock_period, early_lock_period, "Lock periods updated");
        self.events.push(EscrowEvent::LockPeriodsUpdated {
            default_lock_period,
            early_lock_period,
        });
        Ok(())
    }

    /// Attach the credential registry. DEFAULT_ADMIN-only.
    ///
    /// Locks created before a registry was attached carry no certificate.
    ///
    /// # Errors
    /// `Configuration` if a registry is already attached. Existing locks
    /// reference certificates by id in that registry.
    pub fn set_credential_registry(&mut self, ctx: CallContext, registry: R) -> Result<()> {
        self.access.require_role(ctx.caller, Role::DefaultAdmin)?;
        if self.registry.is_some() {
            return Err(CertlockError::Configuration(
                "credential registry already attached".into(),
            ));
        }
        self.registry = Some(registry);
        tracing::info!(by = %ctx.caller, "Credential registry attached");
        self.events.push(EscrowEvent::RegistryAttached);
        Ok(())
    }

    // =================================================================
    // Queries
    // =================================================================

    /// The caller-facing "most recent lock" query.
    pub fn get_user_last_lock(&self, account: AccountId) -> Result<&LockRecord> {
        self.ledger.get_last_lock(account)
    }

    pub fn get_lock(&self, account: AccountId, index: LockIndex) -> Result<&LockRecord> {
        self.ledger.get_lock(account, index)
    }

    #[must_use]
    pub fn locks_of(&self, account: AccountId) -> &[LockRecord] {
        self.ledger.locks_of(account)
    }

    #[must_use]
    pub fn lock_count(&self, account: AccountId) -> usize {
        self.ledger.lock_count(account)
    }

    #[must_use]
    pub fn default_lock_period(&self) -> u64 {
        self.policy.default_period()
    }

    #[must_use]
    pub fn early_lock_period(&self) -> u64 {
        self.policy.early_period()
    }

    #[must_use]
    pub fn domain_separator(&self) -> &DomainSeparator {
        self.verifier.domain_separator()
    }

    #[must_use]
    pub fn custody_account(&self) -> AccountId {
        self.custody
    }

    /// Amount currently held in custody.
    #[must_use]
    pub fn custody_balance(&self) -> Decimal {
        self.balances.balance_of(self.custody)
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.access.is_paused()
    }

    #[must_use]
    pub fn has_role(&self, account: AccountId, role: Role) -> bool {
        self.access.has_role(&account, role)
    }

    #[must_use]
    pub fn is_authorization_consumed(&self, token: &AuthorizationToken) -> bool {
        self.verifier.is_consumed(token)
    }

    /// Status of the certificate backing a lock, read from the registry.
    #[must_use]
    pub fn certificate_status(&self, account: AccountId, index: LockIndex) -> Option<CertificateStatus> {
        let id = self.ledger.get_lock(account, index).ok()?.certificate_id?;
        self.registry
            .as_ref()?
            .get_attribute(id, attr::STATUS)
            .as_deref()
            .and_then(CertificateStatus::from_attribute)
    }

    #[must_use]
    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    #[must_use]
    pub fn balances(&self) -> &B {
        &self.balances
    }

    /// Direct access to the balance holder, e.g. for account holders'
    /// approvals. The escrow's own ledger is not reachable through it.
    pub fn balances_mut(&mut self) -> &mut B {
        &mut self.balances
    }

    #[must_use]
    pub fn registry(&self) -> Option<&R> {
        self.registry.as_ref()
    }

    /// Events recorded so far, in commit order.
    #[must_use]
    pub fn events(&self) -> &[EscrowEvent] {
        &self.events
    }

    /// Drain the recorded events.
    pub fn take_events(&mut self) -> Vec<EscrowEvent> {
        std::mem::take(&mut self.events)
    }

    // =================================================================
    // Internals
    // =================================================================

    fn require_release_mode(&self, mode: ReleaseMode) -> Result<()> {
        if self.config.release_mode == mode {
            Ok(())
        } else {
            Err(CertlockError::WrongReleaseMode {
                expected: self.config.release_mode,
            })
        }
    }

    fn mint_certificate(
        &mut self,
        owner: AccountId,
        auth: &DepositAuthorization,
        amount: Decimal,
        index: LockIndex,
    ) -> Result<Option<CertificateId>> {
        let Some(registry) = self.registry.as_mut() else {
            return Ok(None);
        };
        registry
            .mint(owner, deposit_attributes(auth, amount, index))
            .map(Some)
            .map_err(into_registry_failed)
    }

    fn set_certificate_status(&mut self, id: CertificateId, status: CertificateStatus) -> Result<()> {
        match self.registry.as_mut() {
            Some(registry) => registry
                .set_attribute(id, attr::STATUS, status.as_str())
                .map_err(into_registry_failed),
            None => Ok(()),
        }
    }

    /// Undo the custody `transfer_from` after a later step of `lock` failed,
    /// restoring both the balance and the spent allowance.
    fn refund(&mut self, account: AccountId, amount: Decimal) {
        match self
            .balances
            .reverse_transfer_from(self.custody, account, self.custody, amount)
        {
            Ok(()) => tracing::warn!(account = %account, amount = %amount, "Lock rolled back"),
            Err(err) => tracing::error!(
                account = %account,
                amount = %amount,
                error = %err,
                "Failed to refund custody transfer during rollback"
            ),
        }
    }

    /// `authorize` already checked freshness and nothing has consumed a token
    /// since, so this cannot fail under serial execution.
    fn commit_authorization(&mut self, proof: Authorized, now: Timestamp) -> Result<()> {
        self.verifier
            .consume(proof, now)
            .map_err(|err| CertlockError::Internal(format!("token consumed mid-operation: {err}")))
    }
}

fn into_transfer_failed(err: CertlockError) -> CertlockError {
    match err {
        CertlockError::TransferFailed { .. } => err,
        other => CertlockError::TransferFailed {
            reason: other.to_string(),
        },
    }
}

fn into_registry_failed(err: CertlockError) -> CertlockError {
    match err {
        CertlockError::RegistryFailed { .. } => err,
        other => CertlockError::RegistryFailed {
            reason: other.to_string(),
        },
    }
}
