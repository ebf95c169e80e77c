//! Shared fixtures wiring the full in-memory stack for handler tests.

use std::sync::Arc;

use actix_web::web;

use crate::domain::{
    AdminSeed, AuthorizationGate, IdentityService, SocialGraphService, ensure_bootstrap_admin,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{DocumentUserStore, InMemoryDocumentStore, UNIQUE_USER_FIELDS};
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenService};

/// Signing secret shared by the test token service.
pub(crate) const TEST_SECRET: &[u8] = b"test-signing-secret";

type TestUserStore = DocumentUserStore<InMemoryDocumentStore>;

/// Fully wired in-memory stack plus handles to its adapters.
pub(crate) struct TestStack {
    pub state: web::Data<HttpState>,
    pub store: Arc<TestUserStore>,
    pub hasher: Arc<Argon2PasswordHasher>,
    pub tokens: Arc<JwtTokenService>,
}

/// Build the composition the server uses, backed by an in-memory collection
/// and a single-iteration hasher to keep tests fast.
pub(crate) fn test_stack() -> TestStack {
    let store = Arc::new(DocumentUserStore::new(
        InMemoryDocumentStore::with_unique_fields(UNIQUE_USER_FIELDS),
    ));
    let hasher = Arc::new(Argon2PasswordHasher::try_new(1).expect("one iteration is valid"));
    let tokens = Arc::new(JwtTokenService::with_default_lifetime(TEST_SECRET));
    let identity = Arc::new(IdentityService::new(
        store.clone(),
        hasher.clone(),
        tokens.clone(),
    ));

    let state = HttpState {
        identity: identity.clone(),
        queries: identity.clone(),
        login: identity,
        social: Arc::new(SocialGraphService::new(store.clone())),
        authorizer: Arc::new(AuthorizationGate::new(tokens.clone())),
    };

    TestStack {
        state: web::Data::new(state),
        store,
        hasher,
        tokens,
    }
}

/// Seed the bootstrap administrator `root`/`root@x.com`/`rootpw`.
pub(crate) async fn seed_admin(stack: &TestStack) {
    let seed =
        AdminSeed::try_from_parts("root", "root@x.com", "rootpw").expect("valid admin seed");
    ensure_bootstrap_admin(stack.store.as_ref(), stack.hasher.as_ref(), &seed)
        .await
        .expect("seeding succeeds");
}
