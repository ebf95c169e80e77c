//! Port for signed, time-limited session tokens.
//!
//! Tokens are stateless: validity is purely cryptographic plus time-based,
//! there is no server-side session record and no revocation list. A token
//! stays valid until natural expiry even if the account is disabled or
//! deleted in the meantime; that tradeoff is documented in DESIGN.md.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::user::{Role, UserId};

/// Opaque signed session token string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap an encoded token.
    #[must_use]
    pub const fn new(encoded: String) -> Self {
        Self(encoded)
    }

    /// The encoded token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<SessionToken> for String {
    fn from(value: SessionToken) -> Self {
        value.0
    }
}

/// Claim bundle embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Identifier of the authenticated user.
    pub subject: UserId,
    /// Role copied from the user record at issuance time. Authorisation
    /// evaluates this value only; later role changes have no effect until
    /// the token expires.
    pub role: Role,
    /// Instant after which verification fails.
    pub expires_at: DateTime<Utc>,
}

/// Errors raised by token service adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenServiceError {
    /// The token is malformed, carries a bad signature, or has expired.
    /// One kind for all three: callers must not learn which check failed.
    #[error("token is invalid or expired")]
    Invalid,
    /// Signing failed while issuing; effectively unreachable with a valid
    /// secret.
    #[error("token signing failed: {message}")]
    Signing {
        /// Encoder-supplied description.
        message: String,
    },
}

impl TokenServiceError {
    /// Signing failure with an encoder message.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }
}

/// Port for issuing and verifying session tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a signed token for the subject with a fixed lifetime measured
    /// from now.
    fn issue(&self, subject: &UserId, role: Role) -> Result<SessionToken, TokenServiceError>;

    /// Verify a presented token and return the embedded claims unmodified.
    ///
    /// # Errors
    /// [`TokenServiceError::Invalid`] for a bad signature, malformed input,
    /// or an expired token.
    fn verify(&self, token: &str) -> Result<Claims, TokenServiceError>;
}
