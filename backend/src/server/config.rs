//! Application configuration, read once at process start.
//!
//! All values come from the environment; there is no hot-reload. The lookup
//! seam exists so tests can feed values without touching process state.

use std::net::SocketAddr;

use chrono::Duration;
use tracing::warn;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::AdminSeed;
use crate::outbound::security::{DEFAULT_ITERATIONS, DEFAULT_LIFETIME_SECS};

/// Address served when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `BIND_ADDR` did not parse as a socket address.
    #[error("BIND_ADDR is not a valid socket address: {value}")]
    InvalidBindAddr {
        /// The rejected value.
        value: String,
    },
    /// A numeric variable did not parse or was out of range.
    #[error("{name} is not a valid positive number: {value}")]
    InvalidNumber {
        /// Variable name.
        name: String,
        /// The rejected value.
        value: String,
    },
    /// `TOKEN_SECRET` is required outside development.
    #[error("TOKEN_SECRET must be set")]
    MissingTokenSecret,
    /// Only some of the bootstrap admin variables were provided.
    #[error("bootstrap admin requires username, email, and password together")]
    PartialAdminSeed,
    /// The bootstrap admin values failed domain validation.
    #[error("bootstrap admin configuration invalid: {message}")]
    InvalidAdminSeed {
        /// Validation failure description.
        message: String,
    },
}

/// Process-wide configuration.
#[derive(Debug)]
pub struct AppConfig {
    bind_addr: SocketAddr,
    token_secret: Zeroizing<String>,
    token_lifetime_secs: i64,
    hash_iterations: u32,
    bootstrap_admin: Option<AdminSeed>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a variable is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a variable is missing or malformed.
    pub fn from_lookup(
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr { value: bind_addr })?;

        let token_secret = match lookup("TOKEN_SECRET") {
            Some(secret) if !secret.is_empty() => Zeroizing::new(secret),
            _ => {
                let allow_dev =
                    lookup("TOKEN_SECRET_ALLOW_EPHEMERAL").as_deref() == Some("1");
                if cfg!(debug_assertions) || allow_dev {
                    warn!("using ephemeral token secret (dev only); tokens die with the process");
                    Zeroizing::new(format!("{}{}", Uuid::new_v4(), Uuid::new_v4()))
                } else {
                    return Err(ConfigError::MissingTokenSecret);
                }
            }
        };

        let token_lifetime_secs =
            parse_number(lookup, "TOKEN_TTL_SECS", DEFAULT_LIFETIME_SECS)?;
        let hash_iterations =
            parse_number(lookup, "PASSWORD_HASH_ITERATIONS", DEFAULT_ITERATIONS)?;

        let bootstrap_admin = read_admin_seed(lookup)?;

        Ok(Self {
            bind_addr,
            token_secret,
            token_lifetime_secs,
            hash_iterations,
            bootstrap_admin,
        })
    }

    /// Socket address the server binds to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Token signing secret bytes.
    #[must_use]
    pub fn token_secret(&self) -> &[u8] {
        self.token_secret.as_bytes()
    }

    /// Session token lifetime.
    #[must_use]
    pub fn token_lifetime(&self) -> Duration {
        Duration::seconds(self.token_lifetime_secs)
    }

    /// Argon2 iteration count for newly hashed passwords.
    #[must_use]
    pub const fn hash_iterations(&self) -> u32 {
        self.hash_iterations
    }

    /// Bootstrap administrator seed, when configured.
    #[must_use]
    pub const fn bootstrap_admin(&self) -> Option<&AdminSeed> {
        self.bootstrap_admin.as_ref()
    }
}

fn parse_number<N>(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &str,
    default: N,
) -> Result<N, ConfigError>
where
    N: std::str::FromStr + Copy,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidNumber {
            name: name.to_owned(),
            value: raw,
        }),
    }
}

fn read_admin_seed(
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<Option<AdminSeed>, ConfigError> {
    let username = lookup("BOOTSTRAP_ADMIN_USERNAME");
    let email = lookup("BOOTSTRAP_ADMIN_EMAIL");
    let password = lookup("BOOTSTRAP_ADMIN_PASSWORD");

    match (username, email, password) {
        (None, None, None) => Ok(None),
        (Some(username), Some(email), Some(password)) => {
            let seed = AdminSeed::try_from_parts(&username, &email, &password).map_err(|err| {
                ConfigError::InvalidAdminSeed {
                    message: err.to_string(),
                }
            })?;
            Ok(Some(seed))
        }
        _ => Err(ConfigError::PartialAdminSeed),
    }
}

#[cfg(test)]
mod tests {
    //! Lookup-seam coverage; no process environment is touched.
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_variables_are_unset() {
        let config = AppConfig::from_lookup(&lookup_from(&[("TOKEN_SECRET", "s3cret")]))
            .expect("config loads");
        assert_eq!(config.bind_addr().port(), 8080);
        assert_eq!(config.token_lifetime(), Duration::seconds(DEFAULT_LIFETIME_SECS));
        assert_eq!(config.hash_iterations(), DEFAULT_ITERATIONS);
        assert!(config.bootstrap_admin().is_none());
        assert_eq!(config.token_secret(), b"s3cret");
    }

    #[test]
    fn malformed_bind_addr_is_rejected() {
        let err = AppConfig::from_lookup(&lookup_from(&[
            ("TOKEN_SECRET", "s3cret"),
            ("BIND_ADDR", "not-an-addr"),
        ]))
        .expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    }

    #[test]
    fn malformed_ttl_is_rejected() {
        let err = AppConfig::from_lookup(&lookup_from(&[
            ("TOKEN_SECRET", "s3cret"),
            ("TOKEN_TTL_SECS", "ten minutes"),
        ]))
        .expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }

    #[test]
    fn partial_admin_seed_is_rejected() {
        let err = AppConfig::from_lookup(&lookup_from(&[
            ("TOKEN_SECRET", "s3cret"),
            ("BOOTSTRAP_ADMIN_USERNAME", "root"),
        ]))
        .expect_err("must fail");
        assert_eq!(err, ConfigError::PartialAdminSeed);
    }

    #[test]
    fn complete_admin_seed_is_validated_and_kept() {
        let config = AppConfig::from_lookup(&lookup_from(&[
            ("TOKEN_SECRET", "s3cret"),
            ("BOOTSTRAP_ADMIN_USERNAME", "root"),
            ("BOOTSTRAP_ADMIN_EMAIL", "root@x.com"),
            ("BOOTSTRAP_ADMIN_PASSWORD", "rootpw"),
        ]))
        .expect("config loads");
        let seed = config.bootstrap_admin().expect("seed present");
        assert_eq!(seed.username().as_ref(), "root");
    }

    #[test]
    fn invalid_admin_seed_values_are_rejected() {
        let err = AppConfig::from_lookup(&lookup_from(&[
            ("TOKEN_SECRET", "s3cret"),
            ("BOOTSTRAP_ADMIN_USERNAME", "root"),
            ("BOOTSTRAP_ADMIN_EMAIL", "not-an-email"),
            ("BOOTSTRAP_ADMIN_PASSWORD", "rootpw"),
        ]))
        .expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidAdminSeed { .. }));
    }
}
