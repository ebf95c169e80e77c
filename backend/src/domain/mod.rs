//! Domain primitives, ports, and services.
//!
//! Purpose: strongly typed account entities with their invariants enforced at
//! construction, the hexagonal port traits, and the services that implement
//! the identity, social-graph, and authorisation use-cases. Types stay
//! immutable and transport agnostic; each documents its invariants and serde
//! contract in its own Rustdoc.

pub mod authorization;
pub mod bootstrap;
pub mod credentials;
pub mod error;
pub mod identity_service;
pub mod ports;
pub mod social_graph;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::authorization::AuthorizationGate;
pub use self::bootstrap::{AdminSeed, SeedOutcome, ensure_bootstrap_admin};
pub use self::credentials::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity_service::IdentityService;
pub use self::social_graph::SocialGraphService;
pub use self::user::{
    EmailAddress, NewUserRecord, PasswordHashString, Registration, Role, User, UserDto, UserId,
    UserPatch, UserStatus, UserValidationError, Username,
};

/// Convenient result alias for use-case operations.
pub type ApiResult<T> = Result<T, Error>;
