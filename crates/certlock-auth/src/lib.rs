//! # certlock-auth
//!
//! **Authorization layer**: turns a signed typed document into a verified,
//! single-use permission.
//!
//! ## Pipeline
//!
//! ```text
//! message ──struct_hash──▶ structHash ─┐
//!                                       ├─ H(0x19 0x01 ‖ domain ‖ structHash) ─▶ digest
//! DomainSeparator ──────────────────────┘
//! digest + TypedSignature ──recover──▶ signer
//! deadline / designated signer / role / consumed set ──authorize──▶ Authorized
//! Authorized ──consume──▶ token spent (irreversible)
//! ```
//!
//! [`AuthorizationVerifier::authorize`] never mutates state. Callers run every
//! other fallible step first and only then [`AuthorizationVerifier::consume`]
//! the proof, so a rejected operation never burns a token.

pub mod domain;
pub mod replay;
pub mod signer;
pub mod verifier;

pub use domain::{DomainSeparator, struct_hash, type_hash, typed_digest};
pub use replay::ConsumedAuthorizations;
pub use signer::TypedSigner;
pub use verifier::{AuthorizationVerifier, Authorized};
