//! Bearer-token extraction and authorisation helpers for handlers.
//!
//! Handlers call [`require`] with the role set their route demands; denial
//! maps to one uniform 401 error so responses never reveal whether a token
//! was missing, expired, forged, or merely under-privileged.

use actix_web::HttpRequest;
use actix_web::http::header::AUTHORIZATION;

use crate::domain::Error;
use crate::domain::ports::{AccessDecision, AuthenticatedSubject, Authorizer, RequiredRoles};

/// Extract the bearer token from the `Authorization` header, if present.
#[must_use]
pub fn bearer_token(request: &HttpRequest) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Run the authorisation gate for this request.
///
/// # Errors
/// A uniform `InvalidToken` error on any denial.
pub fn require(
    authorizer: &dyn Authorizer,
    request: &HttpRequest,
    required: &RequiredRoles,
) -> Result<AuthenticatedSubject, Error> {
    match authorizer.authorize(bearer_token(request), required) {
        AccessDecision::Granted(subject) => Ok(subject),
        AccessDecision::Denied => Err(Error::invalid_token(
            "missing, invalid, or insufficient bearer token",
        )),
    }
}
