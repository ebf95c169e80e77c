//! Backend entry-point: wires adapters, seeds the bootstrap admin, and
//! serves the REST endpoints.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::{
    AuthorizationGate, IdentityService, SocialGraphService, ensure_bootstrap_admin,
};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    DocumentUserStore, InMemoryDocumentStore, UNIQUE_USER_FIELDS,
};
use backend::outbound::security::{Argon2PasswordHasher, JwtTokenService};
use backend::server::config::AppConfig;
use backend::server::{configure_api, configure_health};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(|e| std::io::Error::other(e.to_string()))?;

    // In-memory collection until a driver adapter is wired; the rest of the
    // composition is driver-agnostic.
    let store = Arc::new(DocumentUserStore::new(
        InMemoryDocumentStore::with_unique_fields(UNIQUE_USER_FIELDS),
    ));
    let hasher = Arc::new(
        Argon2PasswordHasher::try_new(config.hash_iterations())
            .map_err(|e| std::io::Error::other(e.to_string()))?,
    );
    let tokens = Arc::new(JwtTokenService::new(
        config.token_secret(),
        config.token_lifetime(),
    ));
    let identity = Arc::new(IdentityService::new(
        store.clone(),
        hasher.clone(),
        tokens.clone(),
    ));

    if let Some(seed) = config.bootstrap_admin() {
        ensure_bootstrap_admin(store.as_ref(), hasher.as_ref(), seed)
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
    }

    let state = web::Data::new(HttpState {
        identity: identity.clone(),
        queries: identity.clone(),
        login: identity,
        social: Arc::new(SocialGraphService::new(store)),
        authorizer: Arc::new(AuthorizationGate::new(tokens)),
    });

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(server_health_state.clone())
            .configure(configure_api)
            .configure(configure_health)
    })
    .bind(config.bind_addr())?;

    health_state.mark_ready();
    server.run().await
}
