//! Behaviour coverage for the user store adapter over the in-memory
//! collection.

use super::*;
use crate::domain::test_support::DUMMY_DIGEST;
use crate::outbound::persistence::document_store::InMemoryDocumentStore;

fn store() -> DocumentUserStore<InMemoryDocumentStore> {
    DocumentUserStore::new(InMemoryDocumentStore::with_unique_fields(
        UNIQUE_USER_FIELDS,
    ))
}

fn record(username: &str, email: &str, role: Role) -> NewUserRecord {
    NewUserRecord {
        username: Username::new(username).expect("valid username"),
        email: EmailAddress::new(email).expect("valid email"),
        password_hash: PasswordHashString::new(DUMMY_DIGEST.to_owned()),
        status: UserStatus::Active,
        role,
        bio: None,
        avatar: None,
        friends: Vec::new(),
    }
}

fn page(limit: usize, offset: usize) -> PageRequest {
    PageRequest::try_new(limit, offset).expect("valid page bounds")
}

#[tokio::test]
async fn insert_round_trips_the_record_and_mints_an_id() {
    let users = store();
    let created = users
        .insert(record("alice", "a@x.com", Role::User))
        .await
        .expect("insert succeeds");

    assert_eq!(created.username().as_ref(), "alice");
    assert_eq!(created.email().as_ref(), "a@x.com");
    assert_eq!(created.password_hash().as_str(), DUMMY_DIGEST);
    assert!(created.friends().is_empty());

    let by_id = users
        .by_id(created.id())
        .await
        .expect("lookup succeeds")
        .expect("record present");
    assert_eq!(by_id, created);
}

#[tokio::test]
async fn lookups_by_email_and_username_find_the_same_record() {
    let users = store();
    let created = users
        .insert(record("alice", "a@x.com", Role::User))
        .await
        .expect("insert succeeds");

    let email = EmailAddress::new("a@x.com").expect("valid email");
    let username = Username::new("alice").expect("valid username");
    assert_eq!(
        users.by_email(&email).await.expect("lookup succeeds"),
        Some(created.clone())
    );
    assert_eq!(
        users.by_username(&username).await.expect("lookup succeeds"),
        Some(created)
    );
    assert!(
        users
            .by_email(&EmailAddress::new("ghost@x.com").expect("valid email"))
            .await
            .expect("lookup succeeds")
            .is_none()
    );
}

#[tokio::test]
async fn duplicate_unique_fields_surface_as_duplicate_key() {
    let users = store();
    users
        .insert(record("alice", "a@x.com", Role::User))
        .await
        .expect("insert succeeds");

    let err = users
        .insert(record("bob", "a@x.com", Role::User))
        .await
        .expect_err("duplicate email must fail");
    assert_eq!(err, UserStoreError::duplicate_key("email"));

    let err = users
        .insert(record("alice", "b@x.com", Role::User))
        .await
        .expect_err("duplicate username must fail");
    assert_eq!(err, UserStoreError::duplicate_key("username"));
}

#[tokio::test]
async fn listing_excludes_the_filtered_role_and_paginates_stably() {
    let users = store();
    users
        .insert(record("root", "root@x.com", Role::Admin))
        .await
        .expect("insert succeeds");
    for (name, email) in [
        ("alice", "a@x.com"),
        ("bob", "b@x.com"),
        ("carol", "c@x.com"),
        ("dave", "d@x.com"),
    ] {
        users
            .insert(record(name, email, Role::User))
            .await
            .expect("insert succeeds");
    }

    let first = users
        .list(page(2, 0), Some(Role::Admin))
        .await
        .expect("list succeeds");
    let names: Vec<_> = first
        .items
        .iter()
        .map(|user| user.username().as_ref().to_owned())
        .collect();
    assert_eq!(names, vec!["alice", "bob"]);

    let repeat = users
        .list(page(2, 0), Some(Role::Admin))
        .await
        .expect("list succeeds");
    assert_eq!(first, repeat);

    let second = users
        .list(page(2, 2), Some(Role::Admin))
        .await
        .expect("list succeeds");
    let names: Vec<_> = second
        .items
        .iter()
        .map(|user| user.username().as_ref().to_owned())
        .collect();
    assert_eq!(names, vec!["carol", "dave"]);

    let unfiltered = users
        .list(page(10, 0), None)
        .await
        .expect("list succeeds");
    assert_eq!(unfiltered.items.len(), 5);
}

#[tokio::test]
async fn both_update_entry_points_apply_identical_merge_semantics() {
    let users = store();
    let created = users
        .insert(record("alice", "a@x.com", Role::User))
        .await
        .expect("insert succeeds");

    let patch = UserPatch {
        bio: Some("first".to_owned()),
        ..UserPatch::default()
    };
    let email = EmailAddress::new("a@x.com").expect("valid email");
    let by_email = users
        .update_by_email(&email, &patch)
        .await
        .expect("update succeeds")
        .expect("record matched");
    assert_eq!(by_email.bio(), Some("first"));
    assert_eq!(by_email.username().as_ref(), "alice");

    let patch = UserPatch {
        bio: Some("second".to_owned()),
        ..UserPatch::default()
    };
    let by_id = users
        .update_by_id(created.id(), &patch)
        .await
        .expect("update succeeds")
        .expect("record matched");
    assert_eq!(by_id.bio(), Some("second"));
    assert_eq!(by_id.email().as_ref(), "a@x.com");
}

#[tokio::test]
async fn updates_against_missing_records_return_none() {
    let users = store();
    let email = EmailAddress::new("ghost@x.com").expect("valid email");
    let patch = UserPatch {
        bio: Some("text".to_owned()),
        ..UserPatch::default()
    };
    assert!(
        users
            .update_by_email(&email, &patch)
            .await
            .expect("update succeeds")
            .is_none()
    );
}

#[tokio::test]
async fn empty_patches_return_the_unchanged_record() {
    let users = store();
    let created = users
        .insert(record("alice", "a@x.com", Role::User))
        .await
        .expect("insert succeeds");

    let unchanged = users
        .update_by_id(created.id(), &UserPatch::default())
        .await
        .expect("update succeeds")
        .expect("record matched");
    assert_eq!(unchanged, created);
}

#[tokio::test]
async fn delete_reports_removal_exactly_once() {
    let users = store();
    users
        .insert(record("alice", "a@x.com", Role::User))
        .await
        .expect("insert succeeds");

    let email = EmailAddress::new("a@x.com").expect("valid email");
    assert!(users.delete(&email).await.expect("delete succeeds"));
    assert!(!users.delete(&email).await.expect("delete succeeds"));
    assert!(
        users
            .by_email(&email)
            .await
            .expect("lookup succeeds")
            .is_none()
    );
}

#[tokio::test]
async fn friend_mutations_round_trip_and_deduplicate() {
    let users = store();
    let alice = users
        .insert(record("alice", "a@x.com", Role::User))
        .await
        .expect("insert succeeds");
    let bob = users
        .insert(record("bob", "b@x.com", Role::User))
        .await
        .expect("insert succeeds");

    let once = users
        .add_friend(alice.id(), bob.id())
        .await
        .expect("add succeeds")
        .expect("user matched");
    assert_eq!(once.friends(), &[bob.id().clone()]);

    // Adding the same edge again leaves exactly one entry.
    let twice = users
        .add_friend(alice.id(), bob.id())
        .await
        .expect("add succeeds")
        .expect("user matched");
    assert_eq!(twice.friends(), &[bob.id().clone()]);

    // Removing restores the original empty set.
    let removed = users
        .remove_friend(alice.id(), bob.id())
        .await
        .expect("remove succeeds")
        .expect("user matched");
    assert!(removed.friends().is_empty());

    // Removing an absent edge is a no-op.
    let still_empty = users
        .remove_friend(alice.id(), bob.id())
        .await
        .expect("remove succeeds")
        .expect("user matched");
    assert!(still_empty.friends().is_empty());
}

#[tokio::test]
async fn friend_mutations_on_a_missing_user_return_none() {
    let users = store();
    let ghost = UserId::random();
    let friend = UserId::random();
    assert!(
        users
            .add_friend(&ghost, &friend)
            .await
            .expect("add succeeds")
            .is_none()
    );
    assert!(
        users
            .remove_friend(&ghost, &friend)
            .await
            .expect("remove succeeds")
            .is_none()
    );
}
