//! Identity domain service.
//!
//! Orchestrates registration (uniqueness pre-checks, hashing, role and
//! status defaults), login, lookups, updates, and deletion over the driven
//! ports. Implements the identity driving ports so inbound adapters depend
//! on use-cases rather than on this concrete type.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::credentials::LoginCredentials;
use crate::domain::error::Error;
use crate::domain::ports::{
    CredentialHashError, IdentityCommand, IdentityQuery, LoginService, PasswordHasher,
    SessionToken, TokenService, TokenServiceError, UserStore, UserStoreError,
};
use crate::domain::user::{
    EmailAddress, NewUserRecord, Registration, Role, User, UserId, UserPatch, UserStatus,
    Username,
};

/// Identity service implementing the account use-case ports.
///
/// The registration uniqueness checks and the insert are not one atomic
/// transaction; two concurrent registrations for the same email can both
/// pass the checks, and the loser surfaces the store's unique-key violation
/// as an internal error.
#[derive(Clone)]
pub struct IdentityService<S, H, T> {
    store: Arc<S>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<S, H, T> IdentityService<S, H, T> {
    /// Create a new service over the given adapters.
    pub const fn new(store: Arc<S>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }
}

pub(crate) fn map_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserStoreError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
        UserStoreError::Serialization { message } => {
            Error::internal(format!("user record decoding failed: {message}"))
        }
        // Pre-checks make this a concurrent-registration race; surface it
        // unclassified rather than as a user-correctable conflict.
        UserStoreError::DuplicateKey { field } => {
            Error::internal(format!("unique key violated on {field} during insert"))
        }
    }
}

pub(crate) fn map_hash_error(error: CredentialHashError) -> Error {
    match error {
        CredentialHashError::Hashing { message } => {
            Error::internal(format!("password hashing failed: {message}"))
        }
    }
}

pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| Error::invalid_identifier(format!("invalid user id: {err}")))
}

fn map_issue_error(error: TokenServiceError) -> Error {
    match error {
        TokenServiceError::Invalid => Error::invalid_token("token is invalid or expired"),
        TokenServiceError::Signing { message } => {
            Error::internal(format!("token signing failed: {message}"))
        }
    }
}

const LOGIN_FAILED: &str = "invalid email or password";

#[async_trait]
impl<S, H, T> IdentityCommand for IdentityService<S, H, T>
where
    S: UserStore,
    H: PasswordHasher,
    T: TokenService,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let email = registration.email().clone();
        let username = registration.username().clone();

        if self
            .store
            .by_email(&email)
            .await
            .map_err(map_store_error)?
            .is_some()
        {
            return Err(Error::duplicate_email(format!(
                "user with email {email} already exists"
            )));
        }

        if self
            .store
            .by_username(&username)
            .await
            .map_err(map_store_error)?
            .is_some()
        {
            return Err(Error::duplicate_username(format!(
                "user with name {username} already exists"
            )));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(map_hash_error)?;
        let (bio, avatar) = registration.into_profile();

        // Self-registration always yields a regular account; administrators
        // exist only through the startup seeding step.
        let record = NewUserRecord {
            username,
            email,
            password_hash,
            status: UserStatus::Active,
            role: Role::User,
            bio,
            avatar,
            friends: Vec::new(),
        };

        let user = self.store.insert(record).await.map_err(map_store_error)?;
        info!(user_id = %user.id(), email = %user.email(), "user registered");
        Ok(user)
    }

    async fn update_by_email(
        &self,
        email: &EmailAddress,
        patch: UserPatch,
    ) -> Result<Option<User>, Error> {
        self.store
            .update_by_email(email, &patch)
            .await
            .map_err(map_store_error)
    }

    async fn update_by_id(&self, id: &str, patch: UserPatch) -> Result<Option<User>, Error> {
        let id = parse_user_id(id)?;
        self.store
            .update_by_id(&id, &patch)
            .await
            .map_err(map_store_error)
    }

    async fn delete(&self, email: &EmailAddress) -> Result<bool, Error> {
        let deleted = self.store.delete(email).await.map_err(map_store_error)?;
        if deleted {
            info!(email = %email, "user deleted");
        }
        Ok(deleted)
    }
}

#[async_trait]
impl<S, H, T> IdentityQuery for IdentityService<S, H, T>
where
    S: UserStore,
    H: PasswordHasher,
    T: TokenService,
{
    async fn user_by_id(&self, id: &str) -> Result<Option<User>, Error> {
        let id = parse_user_id(id)?;
        self.store.by_id(&id).await.map_err(map_store_error)
    }

    async fn user_by_email(&self, email: &EmailAddress) -> Result<Option<User>, Error> {
        self.store.by_email(email).await.map_err(map_store_error)
    }

    async fn user_by_username(&self, username: &Username) -> Result<Option<User>, Error> {
        self.store
            .by_username(username)
            .await
            .map_err(map_store_error)
    }

    async fn list_users(
        &self,
        page: PageRequest,
        exclude_role: Option<Role>,
    ) -> Result<Page<User>, Error> {
        self.store
            .list(page, exclude_role)
            .await
            .map_err(map_store_error)
    }
}

#[async_trait]
impl<S, H, T> LoginService for IdentityService<S, H, T>
where
    S: UserStore,
    H: PasswordHasher,
    T: TokenService,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionToken, Error> {
        // Absent account and wrong password produce the same error so the
        // endpoint cannot be used to enumerate accounts.
        let Some(user) = self
            .store
            .by_email(credentials.email())
            .await
            .map_err(map_store_error)?
        else {
            return Err(Error::invalid_credentials(LOGIN_FAILED));
        };

        if !self
            .hasher
            .verify(credentials.password(), user.password_hash())
        {
            return Err(Error::invalid_credentials(LOGIN_FAILED));
        }

        let token = self
            .tokens
            .issue(user.id(), user.role())
            .map_err(map_issue_error)?;
        info!(user_id = %user.id(), "login succeeded");
        Ok(token)
    }
}

#[cfg(test)]
mod tests;
