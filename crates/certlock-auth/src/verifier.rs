//! Authorization verifier — recovers signers and gates single-use tokens.

use certlock_types::{
    AccountId, AuthorizationToken, CertlockError, Result, Timestamp, TypedMessage, TypedSignature,
};
use ed25519_dalek::{Signature, VerifyingKey};

use crate::domain::{DomainSeparator, struct_hash, typed_digest};
use crate::replay::ConsumedAuthorizations;

/// Proof that a message passed every check. Spend it with
/// [`AuthorizationVerifier::consume`] once the surrounding operation can no
/// longer fail.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an authorization is only spent once consumed"]
pub struct Authorized {
    signer: AccountId,
    token: AuthorizationToken,
}

impl Authorized {
    /// The recovered signer.
    pub fn signer(&self) -> AccountId {
        self.signer
    }

    /// The token that consuming this proof spends.
    pub fn token(&self) -> AuthorizationToken {
        self.token
    }
}

/// Verifies typed authorizations for one domain and owns the consumed-token
/// set.
#[derive(Debug)]
pub struct AuthorizationVerifier {
    domain: DomainSeparator,
    consumed: ConsumedAuthorizations,
}

impl AuthorizationVerifier {
    #[must_use]
    pub fn new(domain: DomainSeparator) -> Self {
        Self::with_consumed(domain, ConsumedAuthorizations::new())
    }

    /// Verifier backed by an existing consumed-token set.
    #[must_use]
    pub fn with_consumed(domain: DomainSeparator, consumed: ConsumedAuthorizations) -> Self {
        Self { domain, consumed }
    }

    #[must_use]
    pub fn domain_separator(&self) -> &DomainSeparator {
        &self.domain
    }

    /// Recover the identity that signed `message` under this domain.
    ///
    /// # Errors
    /// [`CertlockError::InvalidSignature`] if the envelope names the zero
    /// identity or a malformed key, or if the signature does not verify over
    /// the typed digest (which is what any altered field produces).
    pub fn recover<M: TypedMessage>(&self, message: &M, sig: &TypedSignature) -> Result<AccountId> {
        if sig.signer.is_zero() {
            return Err(CertlockError::InvalidSignature);
        }
        let key = VerifyingKey::from_bytes(sig.signer.as_bytes())
            .map_err(|_| CertlockError::InvalidSignature)?;
        let signature =
            Signature::from_slice(&sig.signature).map_err(|_| CertlockError::InvalidSignature)?;

        let digest = typed_digest(&self.domain, &struct_hash(message));
        key.verify_strict(&digest, &signature)
            .map_err(|_| CertlockError::InvalidSignature)?;

        Ok(sig.signer)
    }

    /// Run every check on `message` without mutating anything.
    ///
    /// Checks, in order: deadline, signature recovery, designated signer,
    /// signer role (via `signer_has_role`), token freshness.
    pub fn authorize<M, F>(
        &self,
        message: &M,
        sig: &TypedSignature,
        now: Timestamp,
        signer_has_role: F,
    ) -> Result<Authorized>
    where
        M: TypedMessage,
        F: FnOnce(&AccountId) -> bool,
    {
        let deadline = message.deadline();
        if now > deadline {
            tracing::warn!(%deadline, %now, "Authorization rejected: deadline expired");
            return Err(CertlockError::DeadlineExpired { deadline, now });
        }

        let signer = self.recover(message, sig).inspect_err(|_| {
            tracing::warn!(claimed = %sig.signer, "Authorization rejected: bad signature");
        })?;

        if signer != message.signer() || !signer_has_role(&signer) {
            tracing::warn!(
                %signer,
                designated = %message.signer(),
                "Authorization rejected: signer not permitted"
            );
            return Err(CertlockError::InvalidSigner { signer });
        }

        let token = message.authorization();
        self.consumed.check_fresh(&token).inspect_err(|_| {
            tracing::warn!(%token, "Authorization rejected: token replay");
        })?;

        tracing::debug!(%signer, %token, "Authorization verified");
        Ok(Authorized { signer, token })
    }

    /// Spend an authorization. Irreversible.
    pub fn consume(&mut self, proof: Authorized, now: Timestamp) -> Result<()> {
        self.consumed.mark_consumed(proof.token, now)?;
        tracing::debug!(token = %proof.token, signer = %proof.signer, "Authorization consumed");
        Ok(())
    }

    pub fn is_consumed(&self, token: &AuthorizationToken) -> bool {
        self.consumed.is_consumed(token)
    }

    /// Read access to the consumed-token set.
    pub fn consumed(&self) -> &ConsumedAuthorizations {
        &self.consumed
    }
}
