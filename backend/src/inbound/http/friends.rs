//! Friend-edge API handlers.
//!
//! ```text
//! POST   /api/v1/users/{id}/friends/{friend_id}
//! DELETE /api/v1/users/{id}/friends/{friend_id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, post, web};

use crate::domain::ports::RequiredRoles;
use crate::inbound::http::auth;
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::state::HttpState;

/// Add a one-directional friend edge and return the updated user.
#[post("/users/{id}/friends/{friend_id}")]
pub async fn add_friend(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    auth::require(state.authorizer.as_ref(), &request, &RequiredRoles::any())?;

    let (user_id, friend_id) = path.into_inner();
    let user = state.social.add_friend(&user_id, &friend_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Remove a friend edge and return the updated user.
#[delete("/users/{id}/friends/{friend_id}")]
pub async fn remove_friend(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    auth::require(state.authorizer.as_ref(), &request, &RequiredRoles::any())?;

    let (user_id, friend_id) = path.into_inner();
    let user = state.social.remove_friend(&user_id, &friend_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[cfg(test)]
mod tests;
