//! Access guard — role membership and the pause circuit breaker.
//!
//! Every state-mutating entry point consults this guard first. Pausing
//! blocks `lock` and `unlock` uniformly; administrative entry points keep
//! working so the service can be inspected and resumed.

use std::collections::{BTreeSet, HashMap};

use certlock_types::{AccountId, CertlockError, Result, Role};

/// Role tables plus the pause flag.
#[derive(Debug, Default)]
pub struct AccessGuard {
    members: HashMap<Role, BTreeSet<AccountId>>,
    paused: bool,
}

impl AccessGuard {
    /// A guard where `admin` holds every role.
    #[must_use]
    pub fn bootstrap(admin: AccountId) -> Self {
        let mut guard = Self::default();
        for role in Role::ALL {
            guard.members.entry(role).or_default().insert(admin);
        }
        guard
    }

    #[must_use]
    pub fn has_role(&self, account: &AccountId, role: Role) -> bool {
        self.members
            .get(&role)
            .is_some_and(|set| set.contains(account))
    }

    /// Fail with `Unauthorized` if `account` lacks `role`.
    pub fn require_role(&self, account: AccountId, role: Role) -> Result<()> {
        if self.has_role(&account, role) {
            Ok(())
        } else {
            Err(CertlockError::Unauthorized { account, role })
        }
    }

    /// Add `account` to `role`. Returns whether membership changed.
    pub fn grant(&mut self, role: Role, account: AccountId) -> bool {
        self.members.entry(role).or_default().insert(account)
    }

    /// Remove `account` from `role`. Returns whether membership changed.
    pub fn revoke(&mut self, role: Role, account: AccountId) -> bool {
        self.members
            .get_mut(&role)
            .is_some_and(|set| set.remove(&account))
    }

    /// Members of `role`, in key order.
    pub fn members(&self, role: Role) -> impl Iterator<Item = &AccountId> {
        self.members.get(&role).into_iter().flatten()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Fail with `ContractPaused` while paused.
    pub fn require_not_paused(&self) -> Result<()> {
        if self.paused {
            Err(CertlockError::ContractPaused)
        } else {
            Ok(())
        }
    }

    /// Set the pause flag. Idempotent; returns whether the flag changed.
    pub fn pause(&mut self) -> bool {
        !std::mem::replace(&mut self.paused, true)
    }

    /// Clear the pause flag. Idempotent; returns whether the flag changed.
    pub fn unpause(&mut self) -> bool {
        std::mem::replace(&mut self.paused, false)
    }
}
