//! Certificate attributes mirrored into the external credential registry.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{DepositAuthorization, LockIndex};

/// Attribute keys written by the escrow.
pub mod attr {
    pub const STATUS: &str = "status";
    pub const INSTITUTION: &str = "institution";
    pub const TONS: &str = "tons";
    pub const BASE_YEAR: &str = "baseYear";
    pub const BASE_MONTH: &str = "baseMonth";
    pub const TIMESPAN: &str = "timespan";
    pub const AMOUNT: &str = "amount";
    pub const LOCK_INDEX: &str = "lockIndex";
}

/// Certificate status, mirroring the lock's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateStatus {
    /// The backing lock holds funds.
    Active,
    /// The backing lock was released.
    Complete,
}

impl CertificateStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Complete => "COMPLETE",
        }
    }

    /// Parse an attribute value written by [`CertificateStatus::as_str`].
    #[must_use]
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(Self::Active),
            "COMPLETE" => Some(Self::Complete),
            _ => None,
        }
    }
}

impl std::fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value attributes of one certificate.
pub type CertificateAttributes = BTreeMap<String, String>;

/// Attributes minted alongside a new lock: the deposit authorization's
/// metadata, the locked amount and index, and `status = ACTIVE`.
#[must_use]
pub fn deposit_attributes(
    auth: &DepositAuthorization,
    amount: Decimal,
    index: LockIndex,
) -> CertificateAttributes {
    let mut attrs = CertificateAttributes::new();
    attrs.insert(attr::INSTITUTION.into(), auth.institution_name());
    attrs.insert(attr::TONS.into(), auth.tons.to_string());
    attrs.insert(attr::BASE_YEAR.into(), auth.base_year.to_string());
    attrs.insert(attr::BASE_MONTH.into(), auth.base_month.to_string());
    attrs.insert(attr::TIMESPAN.into(), auth.timespan.to_string());
    attrs.insert(attr::AMOUNT.into(), amount.to_string());
    attrs.insert(attr::LOCK_INDEX.into(), index.to_string());
    attrs.insert(attr::STATUS.into(), CertificateStatus::Active.to_string());
    attrs
}
