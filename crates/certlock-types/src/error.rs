//! Error types for the certlock escrow.
//!
//! All errors use the `CL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Authorization errors
//! - 2xx: Ledger / release policy errors
//! - 3xx: Access errors
//! - 4xx: External collaborator errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, AuthorizationToken, LockIndex, Role, Timestamp};

/// Central error enum for all certlock operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CertlockError {
    // =================================================================
    // Authorization Errors (1xx)
    // =================================================================
    /// The signature does not recover to a valid identity over the digest.
    #[error("CL_ERR_100: Invalid signature")]
    InvalidSignature,

    /// The recovered identity is not the designated signer or lacks the role.
    #[error("CL_ERR_101: Invalid signer: {signer}")]
    InvalidSigner { signer: AccountId },

    /// The authorization's deadline has passed.
    #[error("CL_ERR_102: Authorization deadline expired: deadline {deadline}, now {now}")]
    DeadlineExpired { deadline: Timestamp, now: Timestamp },

    /// The authorization token was already consumed (replay attempt).
    #[error("CL_ERR_103: Authorization already used: {0}")]
    AuthorizationReused(AuthorizationToken),

    /// A release authorization names a different account than the caller.
    #[error("CL_ERR_104: Authorization targets {target}, caller is {caller}")]
    AuthorizationTargetMismatch { target: AccountId, caller: AccountId },

    // =================================================================
    // Ledger / Release Policy Errors (2xx)
    // =================================================================
    /// No lock exists at this index for the account.
    #[error("CL_ERR_200: Lock not found: {account} index {index}")]
    LockNotFound { account: AccountId, index: LockIndex },

    /// The account has never locked anything.
    #[error("CL_ERR_201: No locks found for {0}")]
    NoLocksFound(AccountId),

    /// Neither the default nor the early release condition holds yet.
    #[error("CL_ERR_202: In lock period until {releasable_at}")]
    InLockPeriod { releasable_at: Timestamp },

    /// The lock was already released.
    #[error("CL_ERR_203: Lock already released: {account} index {index}")]
    AlreadyReleased { account: AccountId, index: LockIndex },

    /// Lock amounts must be strictly positive.
    #[error("CL_ERR_204: Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// The unlock variant does not match the deployment's release mode.
    #[error("CL_ERR_205: Wrong release mode: deployment requires {expected} unlock")]
    WrongReleaseMode { expected: crate::ReleaseMode },

    // =================================================================
    // Access Errors (3xx)
    // =================================================================
    /// The caller lacks the role required by the entry point.
    #[error("CL_ERR_300: {account} is missing role {role}")]
    Unauthorized { account: AccountId, role: Role },

    /// The service is paused.
    #[error("CL_ERR_301: Contract paused")]
    ContractPaused,

    // =================================================================
    // External Collaborator Errors (4xx)
    // =================================================================
    /// The balance holder rejected a transfer.
    #[error("CL_ERR_400: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// The credential registry rejected a mint or attribute update.
    #[error("CL_ERR_401: Credential registry failed: {reason}")]
    RegistryFailed { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("CL_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Configuration error (invalid periods, empty domain name, etc.).
    #[error("CL_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, CertlockError>;
