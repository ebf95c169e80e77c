//! Driving port for friend-edge mutations.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::user::User;

/// Use-case port for mutating the one-directional friend relation.
///
/// Edges are not symmetric: adding A→B never touches B→A.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialGraphCommand: Send + Sync {
    /// Add a friend edge from `user_id` to `friend_id` and return the
    /// updated user. Adding an already-present edge is a no-op.
    ///
    /// # Errors
    /// `InvalidIdentifier` for a malformed id, `NotFound` when either user
    /// is absent (without mutating anything), `InvalidRequest` for a
    /// self-reference.
    async fn add_friend(&self, user_id: &str, friend_id: &str) -> Result<User, Error>;

    /// Remove the friend edge from `user_id` to `friend_id` and return the
    /// updated user. Removing an absent edge is a no-op.
    ///
    /// # Errors
    /// `InvalidIdentifier` for a malformed id, `NotFound` when the owning
    /// user is absent. The friend is not resolved; it may already be gone.
    async fn remove_friend(&self, user_id: &str, friend_id: &str) -> Result<User, Error>;
}
