//! Consumed-token set — prevents authorization replay.
//!
//! Each authorization token verifies successfully at most once. Consumed
//! tokens are retained forever: deadlines bound how long an unconsumed
//! token is usable, not how long a consumed one is remembered.

use std::collections::HashMap;

use certlock_types::{AuthorizationToken, CertlockError, Result, Timestamp};

/// Append-only set of consumed authorization tokens.
#[derive(Debug, Default)]
pub struct ConsumedAuthorizations {
    /// Token → time it was consumed.
    consumed: HashMap<AuthorizationToken, Timestamp>,
}

impl ConsumedAuthorizations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`CertlockError::AuthorizationReused`] if `token` was consumed.
    pub fn check_fresh(&self, token: &AuthorizationToken) -> Result<()> {
        if self.consumed.contains_key(token) {
            return Err(CertlockError::AuthorizationReused(*token));
        }
        Ok(())
    }

    /// Record `token` as consumed at `now`.
    ///
    /// # Errors
    /// Returns [`CertlockError::AuthorizationReused`] if the token was
    /// already consumed; the original consumption time is kept.
    pub fn mark_consumed(&mut self, token: AuthorizationToken, now: Timestamp) -> Result<()> {
        self.check_fresh(&token)?;
        self.consumed.insert(token, now);
        Ok(())
    }

    pub fn is_consumed(&self, token: &AuthorizationToken) -> bool {
        self.consumed.contains_key(token)
    }

    /// When `token` was consumed, if it was.
    pub fn consumed_at(&self, token: &AuthorizationToken) -> Option<Timestamp> {
        self.consumed.get(token).copied()
    }

    /// Number of tokens consumed so far.
    pub fn len(&self) -> usize {
        self.consumed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty()
    }
}
