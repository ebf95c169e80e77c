//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    Authorizer, IdentityCommand, IdentityQuery, LoginService, SocialGraphCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account mutations: register, update, delete.
    pub identity: Arc<dyn IdentityCommand>,
    /// Account lookups and listings.
    pub queries: Arc<dyn IdentityQuery>,
    /// Credential verification and token issuance.
    pub login: Arc<dyn LoginService>,
    /// Friend-edge mutations.
    pub social: Arc<dyn SocialGraphCommand>,
    /// Token-based authorisation gate.
    pub authorizer: Arc<dyn Authorizer>,
}
