//! Social graph domain service.
//!
//! Friend edges are one-directional references from one user's friend set to
//! another user's identifier. Mutations go through the store's atomic
//! set-add/set-remove primitives so two concurrent calls on the same user
//! cannot lose an update to a read-modify-write race.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::error::Error;
use crate::domain::identity_service::{map_store_error, parse_user_id};
use crate::domain::ports::{SocialGraphCommand, UserStore};
use crate::domain::user::User;

/// Social graph service implementing the friend-edge use-case port.
#[derive(Clone)]
pub struct SocialGraphService<S> {
    store: Arc<S>,
}

impl<S> SocialGraphService<S> {
    /// Create a new service over the given store adapter.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> SocialGraphCommand for SocialGraphService<S>
where
    S: UserStore,
{
    async fn add_friend(&self, user_id: &str, friend_id: &str) -> Result<User, Error> {
        let user = parse_user_id(user_id)?;
        let friend = parse_user_id(friend_id)?;

        if user == friend {
            return Err(Error::invalid_request("users cannot befriend themselves"));
        }

        // Resolve the friend before touching the user so a missing friend
        // leaves the user's record unmodified.
        if self
            .store
            .by_id(&friend)
            .await
            .map_err(map_store_error)?
            .is_none()
        {
            return Err(Error::not_found(format!("user {friend} not found")));
        }

        let Some(updated) = self
            .store
            .add_friend(&user, &friend)
            .await
            .map_err(map_store_error)?
        else {
            return Err(Error::not_found(format!("user {user} not found")));
        };

        info!(user_id = %user, friend_id = %friend, "friend edge added");
        Ok(updated)
    }

    async fn remove_friend(&self, user_id: &str, friend_id: &str) -> Result<User, Error> {
        let user = parse_user_id(user_id)?;
        let friend = parse_user_id(friend_id)?;

        let Some(updated) = self
            .store
            .remove_friend(&user, &friend)
            .await
            .map_err(map_store_error)?
        else {
            return Err(Error::not_found(format!("user {user} not found")));
        };

        info!(user_id = %user, friend_id = %friend, "friend edge removed");
        Ok(updated)
    }
}
