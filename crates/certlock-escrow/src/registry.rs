//! In-memory credential registry.

use std::collections::BTreeMap;

use certlock_types::{
    AccountId, CertificateAttributes, CertificateId, CertificateStatus, CertlockError, Result,
    attr,
};

use crate::collaborators::CredentialRegistry;

/// A stored certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub owner: AccountId,
    pub attributes: CertificateAttributes,
}

/// Reference [`CredentialRegistry`] with sequential ids starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    certificates: BTreeMap<CertificateId, Certificate>,
    last_id: CertificateId,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: CertificateId) -> Option<&Certificate> {
        self.certificates.get(&id)
    }

    /// Parsed `status` attribute.
    #[must_use]
    pub fn status(&self, id: CertificateId) -> Option<CertificateStatus> {
        self.get_attribute(id, attr::STATUS)
            .as_deref()
            .and_then(CertificateStatus::from_attribute)
    }

    /// Certificates owned by `owner`, in mint order.
    pub fn owned_by(&self, owner: AccountId) -> impl Iterator<Item = CertificateId> + '_ {
        self.certificates
            .iter()
            .filter(move |(_, c)| c.owner == owner)
            .map(|(id, _)| *id)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.certificates.len()
    }
}

impl CredentialRegistry for InMemoryRegistry {
    fn mint(&mut self, owner: AccountId, attributes: CertificateAttributes) -> Result<CertificateId> {
        if owner.is_zero() {
            return Err(CertlockError::RegistryFailed {
                reason: "mint to the zero account".into(),
            });
        }
        let id = self.last_id.next();
        self.certificates.insert(id, Certificate { owner, attributes });
        self.last_id = id;
        Ok(id)
    }

    fn set_attribute(&mut self, id: CertificateId, key: &str, value: &str) -> Result<()> {
        let cert = self
            .certificates
            .get_mut(&id)
            .ok_or_else(|| CertlockError::RegistryFailed {
                reason: format!("{id} not found"),
            })?;
        cert.attributes.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_attribute(&self, id: CertificateId, key: &str) -> Option<String> {
        self.certificates
            .get(&id)
            .and_then(|c| c.attributes.get(key))
            .cloned()
    }
}
