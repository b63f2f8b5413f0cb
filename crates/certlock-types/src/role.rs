//! Access roles.

use serde::{Deserialize, Serialize};

/// A named capability held by a set of accounts.
///
/// `DefaultAdmin` administers membership of every role, itself included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Grants and revokes every role; updates lock periods and the registry.
    DefaultAdmin,
    /// Signs authorizations and administers early-withdrawal flags.
    Operator,
    /// Toggles the pause flag.
    Pauser,
    /// May mint certificates in the credential registry. The escrow's own
    /// custody identity must hold it for `lock` to mint.
    Minter,
}

impl Role {
    /// Every role, in a stable order.
    pub const ALL: [Self; 4] = [Self::DefaultAdmin, Self::Operator, Self::Pauser, Self::Minter];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DefaultAdmin => write!(f, "DEFAULT_ADMIN"),
            Self::Operator => write!(f, "OPERATOR"),
            Self::Pauser => write!(f, "PAUSER"),
            Self::Minter => write!(f, "MINTER"),
        }
    }
}
