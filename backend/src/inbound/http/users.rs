//! Users API handlers.
//!
//! ```text
//! POST   /api/v1/users/register {"username":"alice","email":"a@x.com","password":"pw1"}
//! POST   /api/v1/users/login    {"email":"a@x.com","password":"pw1"}
//! GET    /api/v1/users?limit=20&offset=0&includeAdmins=false
//! GET    /api/v1/users/me
//! GET    /api/v1/users/{email}
//! PUT    /api/v1/users/{email}
//! DELETE /api/v1/users/{email}
//! ```
//!
//! Boundary validation happens here, before any service call, via the
//! domain's fallible constructors; handlers then talk to driving ports only.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use pagination::{PageRequest, PaginationError};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::{RequiredRoles, SessionToken};
use crate::domain::{
    EmailAddress, Error, LoginCredentials, LoginValidationError, Registration, Role, UserPatch,
    UserStatus, UserValidationError, Username,
};
use crate::inbound::http::auth;
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/users/register`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Requested handle.
    pub username: String,
    /// Requested email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Optional biography text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Optional avatar reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = UserValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.username,
            &value.email,
            &value.password,
            value.bio,
            value.avatar,
        )
    }
}

/// Login request body for `POST /api/v1/users/login`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Login response carrying the freshly minted session token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Opaque signed session token.
    pub token: SessionToken,
}

fn map_user_validation_error(err: UserValidationError) -> Error {
    let (field, code) = match &err {
        UserValidationError::EmptyId | UserValidationError::InvalidId => ("id", "invalid_id"),
        UserValidationError::EmptyUsername => ("username", "empty_username"),
        UserValidationError::UsernameTooShort { .. } => ("username", "username_too_short"),
        UserValidationError::UsernameTooLong { .. } => ("username", "username_too_long"),
        UserValidationError::UsernameInvalidCharacters => {
            ("username", "username_invalid_characters")
        }
        UserValidationError::InvalidEmail => ("email", "invalid_email"),
        UserValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::InvalidEmail => Error::invalid_request("email address is not valid")
            .with_details(json!({ "field": "email", "code": "invalid_email" })),
        LoginValidationError::EmptyPassword => {
            Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password", "code": "empty_password" }))
        }
    }
}

fn map_pagination_error(err: PaginationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": "limit", "code": "invalid_limit" }))
}

fn parse_email(raw: &str) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw).map_err(map_user_validation_error)
}

/// Register a new account.
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from(payload.into_inner()).map_err(map_user_validation_error)?;
    let user = state.identity.register(registration).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Authenticate and mint a session token.
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_login_validation_error)?;
    let token = state.login.login(&credentials).await?;
    Ok(web::Json(TokenResponse { token }))
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    /// Page size; defaults to the pagination crate's default.
    pub limit: Option<usize>,
    /// Items skipped before the page starts.
    pub offset: Option<usize>,
    /// Include administrator accounts; hidden by default.
    pub include_admins: Option<bool>,
}

/// List known users. Administrators are hidden unless requested.
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    request: HttpRequest,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<HttpResponse> {
    auth::require(state.authorizer.as_ref(), &request, &RequiredRoles::any())?;

    let page = PageRequest::try_new(
        query.limit.unwrap_or(pagination::DEFAULT_LIMIT),
        query.offset.unwrap_or(0),
    )
    .map_err(map_pagination_error)?;
    let exclude_role = if query.include_admins.unwrap_or(false) {
        None
    } else {
        Some(Role::Admin)
    };

    let users = state.queries.list_users(page, exclude_role).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Return the authenticated subject's own record.
///
/// The token outlives the account on deletion, so a valid token whose
/// subject no longer resolves yields 404.
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    request: HttpRequest,
) -> ApiResult<HttpResponse> {
    let subject = auth::require(state.authorizer.as_ref(), &request, &RequiredRoles::any())?;
    let user = state
        .queries
        .user_by_id(subject.subject.as_ref())
        .await?
        .ok_or_else(|| Error::not_found("account no longer exists"))?;
    Ok(HttpResponse::Ok().json(user))
}

/// Fetch a user by email address.
#[get("/users/{email}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    auth::require(state.authorizer.as_ref(), &request, &RequiredRoles::any())?;

    let raw = path.into_inner();
    let email = parse_email(&raw)?;
    let user = state
        .queries
        .user_by_email(&email)
        .await?
        .ok_or_else(|| Error::not_found(format!("user with email {email} not found")))?;
    Ok(HttpResponse::Ok().json(user))
}

/// Update request body for `PUT /api/v1/users/{email}`.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// Replacement handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Replacement email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Replacement biography text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Replacement avatar reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Replacement lifecycle state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

impl TryFrom<UpdateUserRequest> for UserPatch {
    type Error = UserValidationError;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        let username = value.username.map(Username::new).transpose()?;
        let email = value.email.map(EmailAddress::new).transpose()?;
        Ok(Self {
            username,
            email,
            bio: value.bio,
            avatar: value.avatar,
            status: value.status,
        })
    }
}

/// Partial-merge update of a user record. Administrator only.
#[put("/users/{email}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    auth::require(
        state.authorizer.as_ref(),
        &request,
        &RequiredRoles::of([Role::Admin]),
    )?;

    let raw = path.into_inner();
    let email = parse_email(&raw)?;
    let patch = UserPatch::try_from(payload.into_inner()).map_err(map_user_validation_error)?;
    let user = state
        .identity
        .update_by_email(&email, patch)
        .await?
        .ok_or_else(|| Error::not_found(format!("user with email {email} not found")))?;
    Ok(HttpResponse::Ok().json(user))
}

/// Delete a user record. Administrator only.
///
/// Reports whether a record was removed rather than erroring on absence.
#[delete("/users/{email}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    auth::require(
        state.authorizer.as_ref(),
        &request,
        &RequiredRoles::of([Role::Admin]),
    )?;

    let raw = path.into_inner();
    let email = parse_email(&raw)?;
    let deleted = state.identity.delete(&email).await?;
    Ok(HttpResponse::Ok().json(json!({ "deleted": deleted })))
}
