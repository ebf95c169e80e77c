//! Argon2id credential hasher adapter.
//!
//! Digests use the PHC string format, which embeds the algorithm, version,
//! salt, and cost parameters. Verification reads those embedded parameters,
//! so raising the configured cost only affects newly hashed passwords and
//! never breaks digests stored under the old settings.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{
    Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version,
};

use crate::domain::ports::{CredentialHashError, PasswordHasher};
use crate::domain::user::PasswordHashString;

/// Iteration count used when no work factor is configured.
pub const DEFAULT_ITERATIONS: u32 = Params::DEFAULT_T_COST;

/// Argon2id hasher with a configurable iteration count.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Build a hasher with the given iteration count (time cost). Memory and
    /// parallelism stay at the crate's recommended defaults.
    ///
    /// # Errors
    /// Returns [`CredentialHashError`] when the parameters are out of the
    /// algorithm's accepted range (e.g. zero iterations).
    pub fn try_new(iterations: u32) -> Result<Self, CredentialHashError> {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            iterations,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|err| CredentialHashError::hashing(err.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordHashString, CredentialHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|digest| PasswordHashString::new(digest.to_string()))
            .map_err(|err| CredentialHashError::hashing(err.to_string()))
    }

    fn verify(&self, plaintext: &str, digest: &PasswordHashString) -> bool {
        // A digest that does not parse verifies as false, never as an error,
        // and the comparison itself is constant time inside the crate.
        PasswordHash::new(digest.as_str())
            .map(|parsed| {
                Argon2::default()
                    .verify_password(plaintext.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}
