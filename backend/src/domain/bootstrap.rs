//! One-time bootstrap seeding of the administrator account.
//!
//! Granting ADMIN to whoever self-registers under a configured name is a
//! latent privilege-escalation surface: the name can be guessed, or
//! re-registered after deletion. Seeding instead happens once at process
//! start: check for the configured username, create the account with the
//! admin role if absent, and never touch it again. The public registration
//! path can only ever produce regular accounts.

use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::error::Error;
use crate::domain::identity_service::{map_hash_error, map_store_error};
use crate::domain::ports::{PasswordHasher, UserStore};
use crate::domain::user::{
    EmailAddress, NewUserRecord, Role, User, UserStatus, UserValidationError, Username,
};

/// Configured bootstrap administrator credentials.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl AdminSeed {
    /// Construct a seed from raw configuration values.
    ///
    /// # Errors
    /// Returns the first failed field validation.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, UserValidationError> {
        let username = Username::new(username)?;
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }

        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Configured administrator handle.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }
}

/// What the seeding step did.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedOutcome {
    /// No account held the configured username; an admin account was created.
    Created(User),
    /// An account with the configured username already exists. It is left
    /// untouched whatever its role: seeding never escalates an existing
    /// account.
    AlreadyPresent,
}

/// Check-then-create the bootstrap administrator.
///
/// Runs once at startup, before the server accepts traffic. Idempotent
/// across restarts.
///
/// # Errors
/// Store and hashing failures map like any other service error; a unique-key
/// race with a concurrent process surfaces as an internal error.
pub async fn ensure_bootstrap_admin<S, H>(
    store: &S,
    hasher: &H,
    seed: &AdminSeed,
) -> Result<SeedOutcome, Error>
where
    S: UserStore,
    H: PasswordHasher,
{
    if let Some(existing) = store
        .by_username(&seed.username)
        .await
        .map_err(map_store_error)?
    {
        if existing.role() != Role::Admin {
            warn!(
                username = %seed.username,
                "bootstrap admin username is held by a non-admin account; leaving it untouched"
            );
        }
        return Ok(SeedOutcome::AlreadyPresent);
    }

    let password_hash = hasher
        .hash(seed.password.as_str())
        .map_err(map_hash_error)?;

    let record = NewUserRecord {
        username: seed.username.clone(),
        email: seed.email.clone(),
        password_hash,
        status: UserStatus::Active,
        role: Role::Admin,
        bio: None,
        avatar: None,
        friends: Vec::new(),
    };

    let user = store.insert(record).await.map_err(map_store_error)?;
    info!(user_id = %user.id(), username = %user.username(), "bootstrap admin created");
    Ok(SeedOutcome::Created(user))
}
