//! Signed authorization documents.
//!
//! Both variants are typed structured messages: each declares a schema
//! string and exposes its fields in schema order so the verifier can hash
//! them into a struct hash bound to the domain separator.

use serde::{Deserialize, Serialize};

use crate::{AccountId, AuthorizationToken, Timestamp};

/// A single encoded field of a typed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedField<'a> {
    /// Fixed 32-byte value, encoded as-is.
    Bytes32(&'a [u8; 32]),
    /// Unsigned integer, encoded as a 32-byte big-endian word.
    Uint(u64),
    /// Account identity, encoded as its 32 key bytes.
    Address(&'a AccountId),
    /// Dynamic string, encoded as the hash of its bytes.
    String(&'a str),
}

/// A structured message that can be signed under the typed-data scheme.
pub trait TypedMessage {
    /// Primary type schema, e.g. `Certificate(bytes32 institution,...)`.
    const TYPE_SCHEMA: &'static str;

    /// Fields in schema order.
    fn fields(&self) -> Vec<TypedField<'_>>;

    /// Designated signer account.
    fn signer(&self) -> AccountId;

    /// Single-use token.
    fn authorization(&self) -> AuthorizationToken;

    /// Last instant at which the message is usable.
    fn deadline(&self) -> Timestamp;
}

// ---------------------------------------------------------------------------
// Deposit authorization
// ---------------------------------------------------------------------------

/// Certificate document authorizing a lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAuthorization {
    /// Institution tag (right-padded bytes).
    pub institution: [u8; 32],
    /// Quantity tag carried onto the certificate.
    pub tons: u8,
    pub base_year: u16,
    pub base_month: u8,
    /// Period span in months.
    pub timespan: u8,
    pub signer: AccountId,
    pub authorization: AuthorizationToken,
    pub deadline: Timestamp,
}

impl DepositAuthorization {
    /// Institution tag with trailing zero padding stripped.
    #[must_use]
    pub fn institution_name(&self) -> String {
        let end = self
            .institution
            .iter()
            .rposition(|b| *b != 0)
            .map_or(0, |i| i + 1);
        String::from_utf8_lossy(&self.institution[..end]).into_owned()
    }

    /// Encode a UTF-8 label into a zero-padded 32-byte tag. Longer labels
    /// are truncated.
    #[must_use]
    pub fn encode_institution(label: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        let bytes = label.as_bytes();
        let n = bytes.len().min(32);
        out[..n].copy_from_slice(&bytes[..n]);
        out
    }
}

impl TypedMessage for DepositAuthorization {
    const TYPE_SCHEMA: &'static str = "Certificate(bytes32 institution,uint8 tons,uint16 baseYear,uint8 baseMonth,uint8 timespan,address signer,bytes32 authorization,uint64 deadline)";

    fn fields(&self) -> Vec<TypedField<'_>> {
        vec![
            TypedField::Bytes32(&self.institution),
            TypedField::Uint(u64::from(self.tons)),
            TypedField::Uint(u64::from(self.base_year)),
            TypedField::Uint(u64::from(self.base_month)),
            TypedField::Uint(u64::from(self.timespan)),
            TypedField::Address(&self.signer),
            TypedField::Bytes32(self.authorization.as_bytes()),
            TypedField::Uint(self.deadline.as_secs()),
        ]
    }

    fn signer(&self) -> AccountId {
        self.signer
    }

    fn authorization(&self) -> AuthorizationToken {
        self.authorization
    }

    fn deadline(&self) -> Timestamp {
        self.deadline
    }
}

// ---------------------------------------------------------------------------
// Release authorization
// ---------------------------------------------------------------------------

/// Sign-off allowing `account` to release a lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseAuthorization {
    /// Account whose lock may be released.
    pub account: AccountId,
    pub signer: AccountId,
    pub authorization: AuthorizationToken,
    pub deadline: Timestamp,
}

impl TypedMessage for ReleaseAuthorization {
    const TYPE_SCHEMA: &'static str =
        "Release(address account,address signer,bytes32 authorization,uint64 deadline)";

    fn fields(&self) -> Vec<TypedField<'_>> {
        vec![
            TypedField::Address(&self.account),
            TypedField::Address(&self.signer),
            TypedField::Bytes32(self.authorization.as_bytes()),
            TypedField::Uint(self.deadline.as_secs()),
        ]
    }

    fn signer(&self) -> AccountId {
        self.signer
    }

    fn authorization(&self) -> AuthorizationToken {
        self.authorization
    }

    fn deadline(&self) -> Timestamp {
        self.deadline
    }
}

// ---------------------------------------------------------------------------
// Signature envelope
// ---------------------------------------------------------------------------

/// Raw signature over a typed digest, together with the key that produced it.
///
/// Recovery verifies `signature` under `signer`; the envelope alone proves
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedSignature {
    /// Claimed signing key.
    pub signer: AccountId,
    /// 64-byte ed25519 signature.
    pub signature: Vec<u8>,
}

/// Dummy documents for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl DepositAuthorization {
    pub fn dummy(signer: AccountId, deadline: Timestamp) -> Self {
        Self {
            institution: Self::encode_institution("Acme Inc."),
            tons: 3,
            base_year: 2024,
            base_month: 1,
            timespan: 12,
            signer,
            authorization: AuthorizationToken::random(),
            deadline,
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl ReleaseAuthorization {
    pub fn dummy(account: AccountId, signer: AccountId, deadline: Timestamp) -> Self {
        Self {
            account,
            signer,
            authorization: AuthorizationToken::random(),
            deadline,
        }
    }
}
