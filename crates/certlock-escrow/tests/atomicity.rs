//! Failure injection: a failing collaborator must leave no partial effects.

mod common;

use certlock_escrow::{BalanceHolder, CredentialRegistry};
use certlock_types::*;
use common::*;

#[test]
fn mint_failure_refunds_custody_transfer() {
    let (mut h, faults) = FlakyHarness::flaky(EscrowConfig::default());
    h.fund(ALICE, units(100));
    faults.fail_mint.set(true);

    let (auth, sig) = h.deposit_auth();
    let ctx = h.ctx(ALICE);
    let err = h.escrow.lock(ctx, units(100), &auth, &sig).unwrap_err();
    assert!(matches!(err, CertlockError::RegistryFailed { .. }));

    assert_eq!(h.escrow.balances().balance_of(ALICE), units(100));
    assert_eq!(h.allowance(ALICE), units(100));
    assert_eq!(h.escrow.custody_balance(), units(0));
    assert_eq!(h.escrow.lock_count(ALICE), 0);
    assert!(!h.escrow.is_authorization_consumed(&auth.authorization));
    assert!(h.escrow.events().is_empty());

    // The exact approval is still there, so the same document goes through.
    faults.fail_mint.set(false);
    assert_eq!(h.escrow.lock(ctx, units(100), &auth, &sig).unwrap(), 0);
    assert_eq!(h.allowance(ALICE), units(0));
    assert_eq!(h.escrow.custody_balance(), units(100));
}

#[test]
fn missing_allowance_is_transfer_failure() {
    let mut h = MemHarness::new();
    h.escrow.balances_mut().mint(ALICE, units(200));

    let (auth, sig) = h.deposit_auth();
    let ctx = h.ctx(ALICE);
    let err = h.escrow.lock(ctx, units(100), &auth, &sig).unwrap_err();
    assert!(matches!(err, CertlockError::TransferFailed { .. }));
    assert_eq!(h.escrow.lock_count(ALICE), 0);
    assert_eq!(h.escrow.registry().unwrap().count(), 0);
    assert!(!h.escrow.is_authorization_consumed(&auth.authorization));
}

#[test]
fn insufficient_balance_is_transfer_failure() {
    let mut h = MemHarness::new();
    h.fund(ALICE, units(50));
    let err = h.lock(ALICE, units(100)).unwrap_err();
    assert!(matches!(err, CertlockError::TransferFailed { .. }));
    assert_eq!(h.escrow.balances().balance_of(ALICE), units(50));
    assert_eq!(h.allowance(ALICE), units(50));
}

#[test]
fn payout_failure_restores_certificate() {
    let (mut h, faults) = FlakyHarness::flaky(EscrowConfig::default());
    h.fund(ALICE, units(200));
    h.lock(ALICE, units(100)).unwrap();
    h.advance(h.escrow.default_lock_period());

    faults.fail_payout.set(true);
    let ctx = h.ctx(ALICE);
    let err = h.escrow.unlock(ctx, 0).unwrap_err();
    assert!(matches!(err, CertlockError::TransferFailed { .. }));

    let record = h.escrow.get_lock(ALICE, 0).unwrap();
    assert!(!record.released);
    let cert = record.certificate_id.unwrap();
    assert_eq!(
        h.escrow.registry().unwrap().get_attribute(cert, attr::STATUS).as_deref(),
        Some("ACTIVE")
    );
    assert_eq!(h.escrow.custody_balance(), units(100));
    assert_eq!(h.escrow.balances().balance_of(ALICE), units(100));
    assert_eq!(h.allowance(ALICE), units(100));

    faults.fail_payout.set(false);
    h.escrow.unlock(ctx, 0).unwrap();
    assert_eq!(h.escrow.balances().balance_of(ALICE), units(200));
    assert_eq!(
        h.escrow.certificate_status(ALICE, 0),
        Some(CertificateStatus::Complete)
    );
}

#[test]
fn signed_payout_failure_keeps_release_token() {
    let (mut h, faults) = FlakyHarness::flaky(EscrowConfig {
        release_mode: ReleaseMode::Signed,
        ..EscrowConfig::default()
    });
    h.fund(ALICE, units(200));
    h.lock(ALICE, units(100)).unwrap();
    h.advance(h.escrow.default_lock_period());

    let (auth, sig) = h.release_auth(ALICE);
    faults.fail_payout.set(true);
    let ctx = h.ctx(ALICE);
    assert!(h.escrow.unlock_signed(ctx, 0, &auth, &sig).is_err());
    assert!(!h.escrow.is_authorization_consumed(&auth.authorization));

    faults.fail_payout.set(false);
    h.escrow.unlock_signed(ctx, 0, &auth, &sig).unwrap();
    assert!(h.escrow.is_authorization_consumed(&auth.authorization));
}

#[test]
fn status_update_failure_changes_nothing() {
    let (mut h, faults) = FlakyHarness::flaky(EscrowConfig::default());
    h.fund(ALICE, units(200));
    h.lock(ALICE, units(100)).unwrap();
    h.advance(h.escrow.default_lock_period());

    faults.fail_status.set(true);
    let ctx = h.ctx(ALICE);
    let err = h.escrow.unlock(ctx, 0).unwrap_err();
    assert!(matches!(err, CertlockError::RegistryFailed { .. }));
    assert!(!h.escrow.get_lock(ALICE, 0).unwrap().released);
    assert_eq!(h.escrow.custody_balance(), units(100));
    assert_eq!(h.escrow.balances().balance_of(ALICE), units(100));
    assert_eq!(h.allowance(ALICE), units(100));
    assert_eq!(
        h.escrow.certificate_status(ALICE, 0),
        Some(CertificateStatus::Active)
    );
}

#[test]
fn registry_cannot_be_swapped_under_live_locks() {
    let mut h = MemHarness::new();
    h.fund(ALICE, units(100));
    h.lock(ALICE, units(100)).unwrap();

    let admin = h.owner_ctx();
    let err = h
        .escrow
        .set_credential_registry(admin, certlock_escrow::InMemoryRegistry::new())
        .unwrap_err();
    assert!(matches!(err, CertlockError::Configuration(_)));
    assert_eq!(h.escrow.registry().unwrap().count(), 1);

    // The original registry still resolves the lock's certificate.
    h.advance(h.escrow.default_lock_period());
    let ctx = h.ctx(ALICE);
    h.escrow.unlock(ctx, 0).unwrap();
    assert_eq!(h.escrow.custody_balance(), units(0));
    assert_eq!(
        h.escrow.certificate_status(ALICE, 0),
        Some(CertificateStatus::Complete)
    );
}
