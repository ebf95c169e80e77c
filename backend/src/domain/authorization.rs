//! Authorisation gate deciding access from token claims alone.

use std::sync::Arc;

use crate::domain::ports::{
    AccessDecision, AuthenticatedSubject, Authorizer, RequiredRoles, TokenService,
};

/// Gate guarding protected operations.
///
/// The decision algorithm, in order: no token denies; a token the service
/// cannot verify (bad signature, malformed, expired) denies; an empty
/// required-role set grants any verified token; otherwise the embedded role
/// must be a member of the required set. No user lookup happens here.
#[derive(Clone)]
pub struct AuthorizationGate<T> {
    tokens: Arc<T>,
}

impl<T> AuthorizationGate<T> {
    /// Create a gate over the given token service.
    pub const fn new(tokens: Arc<T>) -> Self {
        Self { tokens }
    }
}

impl<T> Authorizer for AuthorizationGate<T>
where
    T: TokenService,
{
    fn authorize<'a>(&self, token: Option<&'a str>, required: &RequiredRoles) -> AccessDecision {
        let Some(presented) = token else {
            return AccessDecision::Denied;
        };

        let Ok(claims) = self.tokens.verify(presented) else {
            return AccessDecision::Denied;
        };

        if required.is_empty() || required.accepts(claims.role) {
            AccessDecision::Granted(AuthenticatedSubject {
                subject: claims.subject,
                role: claims.role,
            })
        } else {
            AccessDecision::Denied
        }
    }
}
