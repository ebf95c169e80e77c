//! Credential hashing and token signing adapters.

pub mod argon2_hasher;
pub mod jwt_tokens;

pub use argon2_hasher::{Argon2PasswordHasher, DEFAULT_ITERATIONS};
pub use jwt_tokens::{DEFAULT_LIFETIME_SECS, JwtTokenService};
