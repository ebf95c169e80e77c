//! Domain ports and supporting types for the hexagonal boundary.

mod authorizer;
mod identity;
mod password_hasher;
mod social_graph;
mod token_service;
mod user_store;

#[cfg(test)]
pub use authorizer::MockAuthorizer;
pub use authorizer::{AccessDecision, AuthenticatedSubject, Authorizer, RequiredRoles};
#[cfg(test)]
pub use identity::{MockIdentityCommand, MockIdentityQuery, MockLoginService};
pub use identity::{IdentityCommand, IdentityQuery, LoginService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{CredentialHashError, PasswordHasher};
#[cfg(test)]
pub use social_graph::MockSocialGraphCommand;
pub use social_graph::SocialGraphCommand;
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{Claims, SessionToken, TokenService, TokenServiceError};
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{UserStore, UserStoreError};
