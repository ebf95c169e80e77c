//! Document-store-backed user store adapter.
//!
//! Maps the typed [`UserStore`] port onto collection-level CRUD. The
//! persisted record shape is `{id, username, email, passwordHash, status,
//! role, bio?, avatar?, friends: [id…]}`; the optional profile fields are
//! omitted rather than stored as null.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use serde_json::{Value, json};

use crate::domain::ports::{UserStore, UserStoreError};
use crate::domain::user::{
    EmailAddress, NewUserRecord, PasswordHashString, Role, User, UserId, UserPatch, UserStatus,
    Username,
};

use super::document_store::{Document, DocumentStore, DocumentStoreError, Filter, Update};

/// Fields the backing collection must keep unique.
pub const UNIQUE_USER_FIELDS: [&str; 2] = ["email", "username"];

/// User store adapter over a generic document collection.
pub struct DocumentUserStore<S> {
    collection: S,
}

impl<S> DocumentUserStore<S> {
    /// Wrap a document collection.
    pub const fn new(collection: S) -> Self {
        Self { collection }
    }
}

fn map_store_error(error: DocumentStoreError) -> UserStoreError {
    match error {
        DocumentStoreError::Connection { message } => UserStoreError::connection(message),
        DocumentStoreError::Operation { message } => UserStoreError::query(message),
        DocumentStoreError::DuplicateKey { field } => UserStoreError::duplicate_key(field),
    }
}

fn record_to_document(record: NewUserRecord) -> Document {
    let NewUserRecord {
        username,
        email,
        password_hash,
        status,
        role,
        bio,
        avatar,
        friends,
    } = record;

    let mut document = Document::new();
    document.insert("username".to_owned(), json!(String::from(username)));
    document.insert("email".to_owned(), json!(String::from(email)));
    document.insert(
        "passwordHash".to_owned(),
        json!(String::from(password_hash)),
    );
    document.insert("status".to_owned(), json!(status));
    document.insert("role".to_owned(), json!(role));
    if let Some(bio) = bio {
        document.insert("bio".to_owned(), json!(bio));
    }
    if let Some(avatar) = avatar {
        document.insert("avatar".to_owned(), json!(avatar));
    }
    document.insert(
        "friends".to_owned(),
        json!(friends.into_iter().map(String::from).collect::<Vec<_>>()),
    );
    document
}

fn string_field(document: &Document, field: &str) -> Result<String, UserStoreError> {
    document
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| UserStoreError::serialization(format!("missing field {field}")))
}

fn optional_string_field(document: &Document, field: &str) -> Option<String> {
    document
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
}

fn enum_field<T: serde::de::DeserializeOwned>(
    document: &Document,
    field: &str,
) -> Result<T, UserStoreError> {
    let value = document
        .get(field)
        .cloned()
        .ok_or_else(|| UserStoreError::serialization(format!("missing field {field}")))?;
    serde_json::from_value(value)
        .map_err(|err| UserStoreError::serialization(format!("bad field {field}: {err}")))
}

fn document_to_user(document: &Document) -> Result<User, UserStoreError> {
    let id = UserId::new(string_field(document, "id")?)
        .map_err(|err| UserStoreError::serialization(format!("bad field id: {err}")))?;
    let username = Username::new(string_field(document, "username")?)
        .map_err(|err| UserStoreError::serialization(format!("bad field username: {err}")))?;
    let email = EmailAddress::new(string_field(document, "email")?)
        .map_err(|err| UserStoreError::serialization(format!("bad field email: {err}")))?;
    let password_hash = PasswordHashString::new(string_field(document, "passwordHash")?);
    let status: UserStatus = enum_field(document, "status")?;
    let role: Role = enum_field(document, "role")?;

    let friends = document
        .get("friends")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    item.as_str()
                        .ok_or_else(|| {
                            UserStoreError::serialization("friend entry is not a string")
                        })
                        .and_then(|raw| {
                            UserId::new(raw).map_err(|err| {
                                UserStoreError::serialization(format!("bad friend id: {err}"))
                            })
                        })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?
        .unwrap_or_default();

    Ok(User::new(id, username, email, password_hash, status, role)
        .with_profile(
            optional_string_field(document, "bio"),
            optional_string_field(document, "avatar"),
        )
        .with_friends(friends))
}

fn patch_to_merge(patch: &UserPatch) -> Document {
    let mut fields = Document::new();
    if let Some(username) = &patch.username {
        fields.insert("username".to_owned(), json!(username.as_ref()));
    }
    if let Some(email) = &patch.email {
        fields.insert("email".to_owned(), json!(email.as_ref()));
    }
    if let Some(bio) = &patch.bio {
        fields.insert("bio".to_owned(), json!(bio));
    }
    if let Some(avatar) = &patch.avatar {
        fields.insert("avatar".to_owned(), json!(avatar));
    }
    if let Some(status) = patch.status {
        fields.insert("status".to_owned(), json!(status));
    }
    fields
}

impl<S> DocumentUserStore<S>
where
    S: DocumentStore,
{
    async fn find_user(&self, filter: &Filter) -> Result<Option<User>, UserStoreError> {
        self.collection
            .find_one(filter)
            .await
            .map_err(map_store_error)?
            .as_ref()
            .map(document_to_user)
            .transpose()
    }

    async fn update_user(
        &self,
        filter: Filter,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserStoreError> {
        // An empty patch changes nothing; read the current record instead of
        // sending an empty merge downstream.
        if patch.is_empty() {
            return self.find_user(&filter).await;
        }

        self.collection
            .update_one(&filter, &Update::Merge(patch_to_merge(patch)))
            .await
            .map_err(map_store_error)?
            .as_ref()
            .map(document_to_user)
            .transpose()
    }

    async fn mutate_friends(
        &self,
        user: &UserId,
        update: Update,
    ) -> Result<Option<User>, UserStoreError> {
        self.collection
            .update_one(&Filter::field_eq("id", user.as_ref()), &update)
            .await
            .map_err(map_store_error)?
            .as_ref()
            .map(document_to_user)
            .transpose()
    }
}

#[async_trait]
impl<S> UserStore for DocumentUserStore<S>
where
    S: DocumentStore,
{
    async fn by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        self.find_user(&Filter::field_eq("id", id.as_ref())).await
    }

    async fn by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserStoreError> {
        self.find_user(&Filter::field_eq("email", email.as_ref()))
            .await
    }

    async fn by_username(&self, username: &Username) -> Result<Option<User>, UserStoreError> {
        self.find_user(&Filter::field_eq("username", username.as_ref()))
            .await
    }

    async fn list(
        &self,
        page: PageRequest,
        exclude_role: Option<Role>,
    ) -> Result<Page<User>, UserStoreError> {
        let filter = exclude_role
            .map(|role| Filter::default().and_ne("role", json!(role)))
            .unwrap_or_default();

        let users = self
            .collection
            .find(&filter, page.limit(), page.offset())
            .await
            .map_err(map_store_error)?
            .iter()
            .map(document_to_user)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(users, page))
    }

    async fn insert(&self, record: NewUserRecord) -> Result<User, UserStoreError> {
        let stored = self
            .collection
            .insert(record_to_document(record))
            .await
            .map_err(map_store_error)?;
        document_to_user(&stored)
    }

    async fn update_by_email(
        &self,
        email: &EmailAddress,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserStoreError> {
        self.update_user(Filter::field_eq("email", email.as_ref()), patch)
            .await
    }

    async fn update_by_id(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserStoreError> {
        self.update_user(Filter::field_eq("id", id.as_ref()), patch)
            .await
    }

    async fn delete(&self, email: &EmailAddress) -> Result<bool, UserStoreError> {
        self.collection
            .delete_one(&Filter::field_eq("email", email.as_ref()))
            .await
            .map_err(map_store_error)
    }

    async fn add_friend(
        &self,
        user: &UserId,
        friend: &UserId,
    ) -> Result<Option<User>, UserStoreError> {
        self.mutate_friends(
            user,
            Update::AddToSet {
                field: "friends".to_owned(),
                value: json!(friend.as_ref()),
            },
        )
        .await
    }

    async fn remove_friend(
        &self,
        user: &UserId,
        friend: &UserId,
    ) -> Result<Option<User>, UserStoreError> {
        self.mutate_friends(
            user,
            Update::Pull {
                field: "friends".to_owned(),
                value: json!(friend.as_ref()),
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests;
