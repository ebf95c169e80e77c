//! Port for one-way password hashing and verification.

use crate::domain::user::PasswordHashString;

/// Errors raised while deriving a digest.
///
/// Verification never errors: a malformed or mismatched digest is simply
/// `false`, so callers cannot distinguish the two and leak digest state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialHashError {
    /// The hashing primitive failed; effectively unreachable under normal
    /// operation.
    #[error("password hashing failed: {message}")]
    Hashing {
        /// Primitive-supplied description.
        message: String,
    },
}

impl CredentialHashError {
    /// Hashing failure with a primitive message.
    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }
}

/// Port for credential hashing adapters.
///
/// Implementations must salt per call (two digests of the same plaintext
/// differ), embed their cost parameters in the digest so older digests stay
/// verifiable after a cost change, and compare in constant time.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Derive a salted digest from a plaintext password.
    fn hash(&self, plaintext: &str) -> Result<PasswordHashString, CredentialHashError>;

    /// Verify a plaintext against a stored digest. Malformed digests verify
    /// as `false`, never as an error.
    fn verify(&self, plaintext: &str, digest: &PasswordHashString) -> bool;
}
