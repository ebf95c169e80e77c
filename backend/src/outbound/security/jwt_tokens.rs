//! JWT session token adapter.
//!
//! Tokens are HS256-signed with a single process-wide secret loaded at
//! startup; rotating the secret invalidates every outstanding token at once,
//! with no grace period. Expiry is validated with zero leeway so a token is
//! rejected the second its lifetime ends.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{Claims, SessionToken, TokenService, TokenServiceError};
use crate::domain::user::{Role, UserId};

/// Token lifetime used when none is configured: ten minutes.
pub const DEFAULT_LIFETIME_SECS: i64 = 600;

/// HS256 JWT issue/verify pair.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
    validation: Validation,
}

/// Wire shape of the claim set. Internal to the issue/verify pair.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    role: Role,
    exp: i64,
}

impl JwtTokenService {
    /// Build a token service over the given secret and lifetime.
    #[must_use]
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry must be exact; the default 60s leeway would keep expired
        // tokens verifiable well past their lifetime.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetime,
            validation,
        }
    }

    /// Build a token service with the default ten-minute lifetime.
    #[must_use]
    pub fn with_default_lifetime(secret: &[u8]) -> Self {
        Self::new(secret, Duration::seconds(DEFAULT_LIFETIME_SECS))
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, subject: &UserId, role: Role) -> Result<SessionToken, TokenServiceError> {
        let expires_at = Utc::now() + self.lifetime;
        let claims = WireClaims {
            sub: subject.to_string(),
            role,
            exp: expires_at.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map(SessionToken::new)
            .map_err(|err| TokenServiceError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Claims, TokenServiceError> {
        // Bad signature, malformed structure, and elapsed expiry all
        // collapse into one kind; callers must not learn which check failed.
        let data = decode::<WireClaims>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenServiceError::Invalid)?;

        let subject = UserId::new(&data.claims.sub).map_err(|_| TokenServiceError::Invalid)?;
        let expires_at = DateTime::<Utc>::from_timestamp(data.claims.exp, 0)
            .ok_or(TokenServiceError::Invalid)?;

        Ok(Claims {
            subject,
            role: data.claims.role,
            expires_at,
        })
    }
}
