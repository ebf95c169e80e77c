//! Unit coverage for the identity service over mocked ports.

use super::*;
use crate::domain::error::ErrorCode;
use crate::domain::ports::{MockPasswordHasher, MockTokenService, MockUserStore};
use crate::domain::test_support::{user_named, DUMMY_DIGEST};
use crate::domain::user::PasswordHashString;
use rstest::rstest;

fn service(
    store: MockUserStore,
    hasher: MockPasswordHasher,
    tokens: MockTokenService,
) -> IdentityService<MockUserStore, MockPasswordHasher, MockTokenService> {
    IdentityService::new(Arc::new(store), Arc::new(hasher), Arc::new(tokens))
}

fn registration() -> Registration {
    Registration::try_from_parts("alice", "a@x.com", "pw1", None, None)
        .expect("valid registration")
}

#[tokio::test]
async fn register_assigns_defaults_and_persists() {
    let mut store = MockUserStore::new();
    store.expect_by_email().times(1).return_once(|_| Ok(None));
    store.expect_by_username().times(1).return_once(|_| Ok(None));
    store
        .expect_insert()
        .withf(|record: &NewUserRecord| {
            record.role == Role::User
                && record.status == UserStatus::Active
                && record.friends.is_empty()
                && record.username.as_ref() == "alice"
                && record.email.as_ref() == "a@x.com"
        })
        .times(1)
        .return_once(|record| Ok(crate::domain::test_support::user_from_record(record)));

    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .withf(|plaintext: &str| plaintext == "pw1")
        .times(1)
        .return_once(|_| Ok(PasswordHashString::new(DUMMY_DIGEST.to_owned())));

    let identity = service(store, hasher, MockTokenService::new());
    let user = identity
        .register(registration())
        .await
        .expect("registration succeeds");

    assert_eq!(user.role(), Role::User);
    assert_eq!(user.status(), UserStatus::Active);
    assert!(user.friends().is_empty());
    assert_eq!(user.password_hash().as_str(), DUMMY_DIGEST);
}

#[tokio::test]
async fn register_rejects_duplicate_email_before_username_check() {
    let mut store = MockUserStore::new();
    store
        .expect_by_email()
        .times(1)
        .return_once(|_| Ok(Some(user_named("taken", "a@x.com", Role::User))));
    store.expect_by_username().times(0);
    store.expect_insert().times(0);

    let identity = service(store, MockPasswordHasher::new(), MockTokenService::new());
    let err = identity
        .register(registration())
        .await
        .expect_err("duplicate email must fail");
    assert_eq!(err.code(), ErrorCode::DuplicateEmail);
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let mut store = MockUserStore::new();
    store.expect_by_email().times(1).return_once(|_| Ok(None));
    store
        .expect_by_username()
        .times(1)
        .return_once(|_| Ok(Some(user_named("alice", "other@x.com", Role::User))));
    store.expect_insert().times(0);

    let identity = service(store, MockPasswordHasher::new(), MockTokenService::new());
    let err = identity
        .register(registration())
        .await
        .expect_err("duplicate username must fail");
    assert_eq!(err.code(), ErrorCode::DuplicateUsername);
}

#[tokio::test]
async fn register_surfaces_insert_race_as_internal() {
    let mut store = MockUserStore::new();
    store.expect_by_email().times(1).return_once(|_| Ok(None));
    store.expect_by_username().times(1).return_once(|_| Ok(None));
    store
        .expect_insert()
        .times(1)
        .return_once(|_| Err(UserStoreError::duplicate_key("email")));

    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .return_once(|_| Ok(PasswordHashString::new(DUMMY_DIGEST.to_owned())));

    let identity = service(store, hasher, MockTokenService::new());
    let err = identity
        .register(registration())
        .await
        .expect_err("insert race must fail");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn login_with_unknown_email_is_uninformative() {
    let mut store = MockUserStore::new();
    store.expect_by_email().times(1).return_once(|_| Ok(None));

    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().times(0);

    let identity = service(store, hasher, MockTokenService::new());
    let credentials =
        LoginCredentials::try_from_parts("ghost@x.com", "pw1").expect("valid credentials");
    let err = identity
        .login(&credentials)
        .await
        .expect_err("unknown email must fail");
    assert_eq!(err.code(), ErrorCode::InvalidCredentials);
    assert_eq!(err.message(), LOGIN_FAILED);
}

#[tokio::test]
async fn login_with_wrong_password_is_uninformative() {
    let mut store = MockUserStore::new();
    store
        .expect_by_email()
        .times(1)
        .return_once(|_| Ok(Some(user_named("alice", "a@x.com", Role::User))));

    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().times(1).return_once(|_, _| false);

    let identity = service(store, hasher, MockTokenService::new());
    let credentials =
        LoginCredentials::try_from_parts("a@x.com", "wrong").expect("valid credentials");
    let err = identity
        .login(&credentials)
        .await
        .expect_err("wrong password must fail");
    assert_eq!(err.code(), ErrorCode::InvalidCredentials);
    assert_eq!(err.message(), LOGIN_FAILED);
}

#[tokio::test]
async fn login_issues_token_carrying_id_and_role() {
    let user = user_named("alice", "a@x.com", Role::Admin);
    let expected_id = user.id().clone();

    let mut store = MockUserStore::new();
    store
        .expect_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(user)));

    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().times(1).return_once(|_, _| true);

    let mut tokens = MockTokenService::new();
    tokens
        .expect_issue()
        .withf(move |subject: &UserId, role: &Role| {
            *subject == expected_id && *role == Role::Admin
        })
        .times(1)
        .return_once(|_, _| Ok(SessionToken::new("signed-token".to_owned())));

    let identity = service(store, hasher, tokens);
    let credentials =
        LoginCredentials::try_from_parts("a@x.com", "pw1").expect("valid credentials");
    let token = identity.login(&credentials).await.expect("login succeeds");
    assert_eq!(token.as_str(), "signed-token");
}

#[rstest]
#[case("")]
#[case("not-a-uuid")]
#[tokio::test]
async fn user_by_id_rejects_malformed_identifiers(#[case] raw: &str) {
    let mut store = MockUserStore::new();
    store.expect_by_id().times(0);

    let identity = service(store, MockPasswordHasher::new(), MockTokenService::new());
    let err = identity
        .user_by_id(raw)
        .await
        .expect_err("malformed id must fail");
    assert_eq!(err.code(), ErrorCode::InvalidIdentifier);
}

#[tokio::test]
async fn user_by_id_returns_none_for_absent_record() {
    let mut store = MockUserStore::new();
    store.expect_by_id().times(1).return_once(|_| Ok(None));

    let identity = service(store, MockPasswordHasher::new(), MockTokenService::new());
    let found = identity
        .user_by_id("3fa85f64-5717-4562-b3fc-2c963f66afa6")
        .await
        .expect("well-formed id succeeds");
    assert!(found.is_none());
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn delete_reports_whether_a_record_was_removed(#[case] removed: bool) {
    let mut store = MockUserStore::new();
    store
        .expect_delete()
        .times(1)
        .return_once(move |_| Ok(removed));

    let identity = service(store, MockPasswordHasher::new(), MockTokenService::new());
    let email = EmailAddress::new("a@x.com").expect("valid email");
    let deleted = identity.delete(&email).await.expect("delete succeeds");
    assert_eq!(deleted, removed);
}

#[tokio::test]
async fn store_connection_loss_maps_to_service_unavailable() {
    let mut store = MockUserStore::new();
    store
        .expect_by_email()
        .times(1)
        .return_once(|_| Err(UserStoreError::connection("refused")));

    let identity = service(store, MockPasswordHasher::new(), MockTokenService::new());
    let email = EmailAddress::new("a@x.com").expect("valid email");
    let err = identity
        .user_by_email(&email)
        .await
        .expect_err("connection loss must fail");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn update_by_id_parses_and_forwards_the_patch() {
    let id = UserId::random();
    let raw = id.to_string();
    let patch = UserPatch {
        bio: Some("new bio".to_owned()),
        ..UserPatch::default()
    };
    let expected_patch = patch.clone();
    let updated = user_named("alice", "a@x.com", Role::User);
    let returned = updated.clone();

    let mut store = MockUserStore::new();
    store
        .expect_update_by_id()
        .withf(move |candidate: &UserId, forwarded: &UserPatch| {
            *candidate == id && *forwarded == expected_patch
        })
        .times(1)
        .return_once(move |_, _| Ok(Some(returned)));

    let identity = service(store, MockPasswordHasher::new(), MockTokenService::new());
    let result = identity
        .update_by_id(&raw, patch)
        .await
        .expect("update succeeds");
    assert_eq!(result, Some(updated));
}
