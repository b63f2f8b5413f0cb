//! Client-side signing of typed messages.

use certlock_types::{AccountId, TypedMessage, TypedSignature};
use ed25519_dalek::{Signer, SigningKey};

use crate::domain::{DomainSeparator, struct_hash, typed_digest};

/// An account able to sign typed messages for a given domain.
pub struct TypedSigner {
    key: SigningKey,
}

impl TypedSigner {
    #[must_use]
    pub fn new(key: SigningKey) -> Self {
        Self { key }
    }

    #[must_use]
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self::new(SigningKey::from_bytes(&seed))
    }

    /// A signer with a fresh random key.
    #[cfg(any(test, feature = "test-helpers"))]
    #[must_use]
    pub fn random() -> Self {
        Self::from_seed(rand::random::<[u8; 32]>())
    }

    /// The account this signer recovers to.
    #[must_use]
    pub fn account(&self) -> AccountId {
        AccountId::from_pubkey(self.key.verifying_key().to_bytes())
    }

    /// Sign `message` for `domain`.
    #[must_use]
    pub fn sign<M: TypedMessage>(&self, domain: &DomainSeparator, message: &M) -> TypedSignature {
        let digest = typed_digest(domain, &struct_hash(message));
        TypedSignature {
            signer: self.account(),
            signature: self.key.sign(&digest).to_bytes().to_vec(),
        }
    }
}

impl std::fmt::Debug for TypedSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedSigner")
            .field("account", &self.account())
            .finish_non_exhaustive()
    }
}
