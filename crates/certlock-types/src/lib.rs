//! # certlock-types
//!
//! Shared types, errors, and configuration for the **certlock** escrow.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`AuthorizationToken`], [`CertificateId`], [`Timestamp`]
//! - **Lock model**: [`LockRecord`], [`LockState`]
//! - **Authorization documents**: [`DepositAuthorization`], [`ReleaseAuthorization`], [`TypedSignature`]
//! - **Certificates**: [`CertificateStatus`], [`CertificateAttributes`]
//! - **Access**: [`Role`]
//! - **Events**: [`EscrowEvent`]
//! - **Configuration**: [`EscrowConfig`], [`ReleaseMode`]
//! - **Errors**: [`CertlockError`] with `CL_ERR_` prefix codes

pub mod authorization;
pub mod certificate;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod lock;
pub mod role;

pub use authorization::*;
pub use certificate::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use lock::*;
pub use role::*;

// Constants are accessed via `certlock_types::constants::FOO`.
