//! Driving port for token-based authorisation decisions.

use std::collections::BTreeSet;

use crate::domain::user::{Role, UserId};

/// Set of roles a protected operation accepts.
///
/// An empty set means any valid token grants access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredRoles(BTreeSet<Role>);

impl RequiredRoles {
    /// Accept any valid token regardless of role.
    #[must_use]
    pub const fn any() -> Self {
        Self(BTreeSet::new())
    }

    /// Accept only tokens carrying one of the given roles.
    #[must_use]
    pub fn of(roles: impl IntoIterator<Item = Role>) -> Self {
        Self(roles.into_iter().collect())
    }

    /// Whether no specific role is required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the set accepts this role.
    #[must_use]
    pub fn accepts(&self, role: Role) -> bool {
        self.0.contains(&role)
    }
}

/// Identity established by a granted authorisation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSubject {
    /// Identifier embedded in the token at issuance.
    pub subject: UserId,
    /// Role embedded in the token at issuance.
    pub role: Role,
}

/// Outcome of an authorisation check.
///
/// Denial carries no reason: a missing token, a forged token, an expired
/// token, and a role mismatch are indistinguishable to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// The token is valid and satisfies the required role set.
    Granted(AuthenticatedSubject),
    /// Access refused.
    Denied,
}

impl AccessDecision {
    /// Whether access was granted.
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }

    /// The authenticated subject, when granted.
    #[must_use]
    pub const fn subject(&self) -> Option<&AuthenticatedSubject> {
        match self {
            Self::Granted(subject) => Some(subject),
            Self::Denied => None,
        }
    }
}

/// Port for the authorisation gate guarding protected operations.
///
/// Decisions evaluate only the claims embedded in the token at issuance
/// time; no fresh user lookup happens, so a role change or deactivation
/// after issuance has no effect until the token naturally expires.
#[cfg_attr(test, mockall::automock)]
pub trait Authorizer: Send + Sync {
    /// Decide whether a presented token satisfies the required role set.
    fn authorize<'a>(&self, token: Option<&'a str>, required: &RequiredRoles) -> AccessDecision;
}
