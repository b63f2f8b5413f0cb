//! Domain separation and typed struct hashing.
//!
//! SHA-256 stands in for keccak; the two-stage layout is otherwise the
//! standard typed-data one: every field occupies one 32-byte word, dynamic
//! strings are hashed first, and the final digest is
//! `H(0x19 ‖ 0x01 ‖ domainSeparator ‖ structHash)`.

use std::fmt;

use certlock_types::{
    AccountId, TypedField, TypedMessage,
    constants::{DOMAIN_TYPE_SCHEMA, TYPED_DIGEST_PREFIX},
};
use sha2::{Digest, Sha256};

/// Binds signatures to one protocol name/version, execution context, and
/// service identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomainSeparator([u8; 32]);

impl DomainSeparator {
    /// Compute the separator for the given domain parameters.
    #[must_use]
    pub fn compute(name: &str, version: &str, chain_id: u64, verifying_contract: &AccountId) -> Self {
        let fields = [
            TypedField::String(name),
            TypedField::String(version),
            TypedField::Uint(chain_id),
            TypedField::Address(verifying_contract),
        ];
        Self(hash_fields(DOMAIN_TYPE_SCHEMA, &fields))
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for DomainSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Hash of a type schema string.
#[must_use]
pub fn type_hash(schema: &str) -> [u8; 32] {
    Sha256::digest(schema.as_bytes()).into()
}

/// Struct hash of a typed message under its own schema.
#[must_use]
pub fn struct_hash<M: TypedMessage>(message: &M) -> [u8; 32] {
    hash_fields(M::TYPE_SCHEMA, &message.fields())
}

/// Final digest that signers sign.
#[must_use]
pub fn typed_digest(domain: &DomainSeparator, struct_hash: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(TYPED_DIGEST_PREFIX);
    hasher.update(domain.as_bytes());
    hasher.update(struct_hash);
    hasher.finalize().into()
}

fn hash_fields(schema: &str, fields: &[TypedField<'_>]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(type_hash(schema));
    for field in fields {
        hasher.update(encode_field(field));
    }
    hasher.finalize().into()
}

fn encode_field(field: &TypedField<'_>) -> [u8; 32] {
    match field {
        TypedField::Bytes32(bytes) => **bytes,
        TypedField::Address(account) => *account.as_bytes(),
        TypedField::String(s) => Sha256::digest(s.as_bytes()).into(),
        TypedField::Uint(v) => {
            let mut word = [0u8; 32];
            word[24..].copy_from_slice(&v.to_be_bytes());
            word
        }
    }
}
