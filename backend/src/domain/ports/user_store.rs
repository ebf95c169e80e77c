//! Port abstraction for user persistence adapters and their errors.
//!
//! The [`UserStore`] trait is the boundary between the identity/social-graph
//! services and whatever document store backs them. Lookups return `None`
//! for absence rather than erroring; mutations report whether a record was
//! touched. Friend mutations are atomic set operations so concurrent calls
//! on the same user cannot lose updates.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::user::{
    EmailAddress, NewUserRecord, Role, User, UserId, UserPatch, Username,
};

/// Persistence errors raised by user store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserStoreError {
    /// Store connection could not be established.
    #[error("user store connection failed: {message}")]
    Connection {
        /// Driver-supplied description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user store query failed: {message}")]
    Query {
        /// Driver-supplied description.
        message: String,
    },
    /// A stored document could not be mapped to the domain model.
    #[error("user record could not be decoded: {message}")]
    Serialization {
        /// Decoder-supplied description.
        message: String,
    },
    /// A unique key (email or username) was violated at insertion time.
    ///
    /// Registration pre-checks normally prevent this; it surfaces when two
    /// concurrent registrations race past the checks.
    #[error("unique key violated on field {field}")]
    DuplicateKey {
        /// The unique field that collided.
        field: String,
    },
}

impl UserStoreError {
    /// Connection failure with a driver message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query failure with a driver message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Record decoding failure.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Unique key violation on the named field.
    pub fn duplicate_key(field: impl Into<String>) -> Self {
        Self::DuplicateKey {
            field: field.into(),
        }
    }
}

/// Port for user record storage and retrieval.
///
/// # Merge semantics
///
/// Both update entry points apply the same partial merge: only fields the
/// [`UserPatch`] populates change, and the post-update record is returned.
///
/// # Friend set semantics
///
/// `add_friend`/`remove_friend` must be atomic set-add/set-remove at the
/// store, never fetch-mutate-replace. Adding a present edge and removing an
/// absent edge are no-ops that still return the record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user by identifier. `None` when absent.
    async fn by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError>;

    /// Fetch a user by email address. `None` when absent.
    async fn by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserStoreError>;

    /// Fetch a user by username. `None` when absent.
    async fn by_username(&self, username: &Username) -> Result<Option<User>, UserStoreError>;

    /// List users in stable insertion order, optionally excluding a role.
    async fn list(
        &self,
        page: PageRequest,
        exclude_role: Option<Role>,
    ) -> Result<Page<User>, UserStoreError>;

    /// Insert a new record; the store mints the identifier.
    async fn insert(&self, record: NewUserRecord) -> Result<User, UserStoreError>;

    /// Partial-merge update keyed by email. `None` when no record matched.
    async fn update_by_email(
        &self,
        email: &EmailAddress,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserStoreError>;

    /// Partial-merge update keyed by identifier. `None` when no record
    /// matched.
    async fn update_by_id(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserStoreError>;

    /// Delete the record with this email. `true` iff a record was removed.
    async fn delete(&self, email: &EmailAddress) -> Result<bool, UserStoreError>;

    /// Atomically add a friend edge. `None` when the user is absent.
    async fn add_friend(
        &self,
        user: &UserId,
        friend: &UserId,
    ) -> Result<Option<User>, UserStoreError>;

    /// Atomically remove a friend edge. `None` when the user is absent.
    async fn remove_friend(
        &self,
        user: &UserId,
        friend: &UserId,
    ) -> Result<Option<User>, UserStoreError>;
}
