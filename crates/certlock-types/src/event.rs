//! Observable events emitted by the escrow for external indexers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, CertificateId, LockIndex, Role};

/// Something that happened, recorded in commit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowEvent {
    Locked {
        account: AccountId,
        lock_index: LockIndex,
        amount: Decimal,
        certificate_id: Option<CertificateId>,
    },
    Unlocked {
        account: AccountId,
        lock_index: LockIndex,
        amount: Decimal,
    },
    EarlyWithdrawalSet {
        account: AccountId,
        lock_index: LockIndex,
        allowed: bool,
    },
    Paused {
        by: AccountId,
    },
    Unpaused {
        by: AccountId,
    },
    RoleGranted {
        role: Role,
        account: AccountId,
        by: AccountId,
    },
    RoleRevoked {
        role: Role,
        account: AccountId,
        by: AccountId,
    },
    LockPeriodsUpdated {
        default_lock_period: u64,
        early_lock_period: u64,
    },
    RegistryAttached,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip() {
        let ev = EscrowEvent::Locked {
            account: AccountId([5u8; 32]),
            lock_index: 0,
            amount: Decimal::new(100, 0),
            certificate_id: Some(CertificateId(1)),
        };
        let json = serde_json::to_string(&ev).unwrap();
        let back: EscrowEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(ev, back);
    }
}
