//! # certlock-escrow
//!
//! **Custody plane**: locks a fungible balance for a configurable period,
//! gated by a signed deposit authorization, and releases it after the period
//! elapses or once an operator grants an early exception. Each lock is
//! mirrored by a certificate whose status follows the lock.
//!
//! ## Architecture
//!
//! 1. **LockLedger**: append-only per-account lock records
//! 2. **ReleasePolicy**: default / early period eligibility
//! 3. **AccessGuard**: role tables and the pause circuit breaker
//! 4. **EscrowService**: `lock`, `unlock`, and administrative entry points,
//!    composing the above with `certlock_auth::AuthorizationVerifier`
//!
//! External collaborators are reached only through [`BalanceHolder`] and
//! [`CredentialRegistry`]. [`InMemoryBalances`] and [`InMemoryRegistry`]
//! are reference implementations.
//!
//! ## Lock Flow
//!
//! ```text
//! lock(amount, auth, sig) → verify → transfer_from(caller → custody)
//!     → mint certificate (ACTIVE) → consume token → append LockRecord → Locked
//! unlock(index) → policy check → certificate COMPLETE
//!     → transfer(custody → caller) → mark released → Unlocked
//! ```

pub mod access;
pub mod balances;
pub mod collaborators;
pub mod ledger;
pub mod policy;
pub mod registry;
pub mod service;

pub use access::AccessGuard;
pub use balances::InMemoryBalances;
pub use collaborators::{BalanceHolder, CredentialRegistry};
pub use ledger::LockLedger;
pub use policy::ReleasePolicy;
pub use registry::{Certificate, InMemoryRegistry};
pub use service::{CallContext, EscrowService};
