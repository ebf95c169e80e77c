//! Driving ports for account registration, lookup, mutation, and login.
//!
//! In hexagonal terms these are *driving* ports: inbound adapters call them
//! to run identity use-cases without knowing (or importing) the backing
//! infrastructure, which keeps HTTP handler tests deterministic.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::credentials::LoginCredentials;
use crate::domain::error::Error;
use crate::domain::ports::token_service::SessionToken;
use crate::domain::user::{EmailAddress, Registration, Role, User, UserPatch, Username};

/// Use-case port for account mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityCommand: Send + Sync {
    /// Register a new account.
    ///
    /// # Errors
    /// `DuplicateEmail`/`DuplicateUsername` on conflicts; `InternalError`
    /// when persistence fails after the checks pass.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Partial-merge update keyed by email. `None` when no record matched.
    async fn update_by_email(
        &self,
        email: &EmailAddress,
        patch: UserPatch,
    ) -> Result<Option<User>, Error>;

    /// Partial-merge update keyed by a raw identifier string.
    ///
    /// # Errors
    /// `InvalidIdentifier` when the id is not in the store's format.
    async fn update_by_id(&self, id: &str, patch: UserPatch) -> Result<Option<User>, Error>;

    /// Delete the account with this email. `true` iff a record was removed;
    /// deleting an absent account is not an error.
    async fn delete(&self, email: &EmailAddress) -> Result<bool, Error>;
}

/// Use-case port for account lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityQuery: Send + Sync {
    /// Fetch a user by a raw identifier string.
    ///
    /// # Errors
    /// `InvalidIdentifier` when the id is malformed — distinct from the
    /// `None` returned for a well-formed id with no record.
    async fn user_by_id(&self, id: &str) -> Result<Option<User>, Error>;

    /// Fetch a user by email address.
    async fn user_by_email(&self, email: &EmailAddress) -> Result<Option<User>, Error>;

    /// Fetch a user by username.
    async fn user_by_username(&self, username: &Username) -> Result<Option<User>, Error>;

    /// List users in stable order, optionally excluding a role from the
    /// listing (e.g. hiding administrators).
    async fn list_users(
        &self,
        page: PageRequest,
        exclude_role: Option<Role>,
    ) -> Result<Page<User>, Error>;
}

/// Use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and mint a session token carrying the user's id
    /// and role.
    ///
    /// # Errors
    /// `InvalidCredentials` for an unknown email or a failed password check
    /// alike; the kind never reveals which.
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionToken, Error>;
}
