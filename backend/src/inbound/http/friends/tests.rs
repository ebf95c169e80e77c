//! Friend-edge endpoint behaviour over the fully wired in-memory stack.

use crate::inbound::http::test_utils::{TestStack, test_stack};
use crate::inbound::http::users::{LoginRequest, RegisterRequest};
use crate::server::configure_api;
use actix_http::Request;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test};
use serde_json::Value;
use uuid::Uuid;

fn test_app(
    stack: &TestStack,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(stack.state.clone())
        .configure(configure_api)
}

async fn body_json(response: ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}

/// Register a user and return `(id, token)`.
async fn onboard<S>(app: &S, username: &str, email: &str) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let created = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/register")
            .set_json(RegisterRequest {
                username: username.to_owned(),
                email: email.to_owned(),
                password: "pw1".to_owned(),
                bio: None,
                avatar: None,
            })
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let id = body_json(created)
        .await
        .get("id")
        .and_then(Value::as_str)
        .expect("id present")
        .to_owned();

    let login = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(LoginRequest {
                email: email.to_owned(),
                password: "pw1".to_owned(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    let token = body_json(login)
        .await
        .get("token")
        .and_then(Value::as_str)
        .expect("token present")
        .to_owned();

    (id, token)
}

fn friend_request(
    method: actix_test::TestRequest,
    user: &str,
    friend: &str,
    token: &str,
) -> Request {
    method
        .uri(&format!("/api/v1/users/{user}/friends/{friend}"))
        .insert_header((AUTHORIZATION, format!("Bearer {token}")))
        .to_request()
}

fn friends_of(body: &Value) -> Vec<String> {
    body.get("friends")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

#[actix_web::test]
async fn add_then_remove_restores_the_original_friend_set() {
    let stack = test_stack();
    let app = actix_test::init_service(test_app(&stack)).await;
    let (alice, token) = onboard(&app, "alice", "a@x.com").await;
    let (bob, _) = onboard(&app, "bob", "b@x.com").await;

    let added = actix_test::call_service(
        &app,
        friend_request(actix_test::TestRequest::post(), &alice, &bob, &token),
    )
    .await;
    assert_eq!(added.status(), StatusCode::OK);
    assert_eq!(friends_of(&body_json(added).await), vec![bob.clone()]);

    // A second add is a no-op: the edge appears exactly once.
    let again = actix_test::call_service(
        &app,
        friend_request(actix_test::TestRequest::post(), &alice, &bob, &token),
    )
    .await;
    assert_eq!(again.status(), StatusCode::OK);
    assert_eq!(friends_of(&body_json(again).await), vec![bob.clone()]);

    let removed = actix_test::call_service(
        &app,
        friend_request(actix_test::TestRequest::delete(), &alice, &bob, &token),
    )
    .await;
    assert_eq!(removed.status(), StatusCode::OK);
    assert!(friends_of(&body_json(removed).await).is_empty());

    // Removing an absent edge stays a no-op.
    let still_empty = actix_test::call_service(
        &app,
        friend_request(actix_test::TestRequest::delete(), &alice, &bob, &token),
    )
    .await;
    assert_eq!(still_empty.status(), StatusCode::OK);
    assert!(friends_of(&body_json(still_empty).await).is_empty());
}

#[actix_web::test]
async fn adding_a_nonexistent_friend_fails_without_mutating() {
    let stack = test_stack();
    let app = actix_test::init_service(test_app(&stack)).await;
    let (alice, token) = onboard(&app, "alice", "a@x.com").await;
    let ghost = Uuid::new_v4().to_string();

    let response = actix_test::call_service(
        &app,
        friend_request(actix_test::TestRequest::post(), &alice, &ghost, &token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let me = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert!(friends_of(&body_json(me).await).is_empty());
}

#[actix_web::test]
async fn self_friendship_is_rejected() {
    let stack = test_stack();
    let app = actix_test::init_service(test_app(&stack)).await;
    let (alice, token) = onboard(&app, "alice", "a@x.com").await;

    let response = actix_test::call_service(
        &app,
        friend_request(actix_test::TestRequest::post(), &alice, &alice, &token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("invalid_request")
    );
}

#[actix_web::test]
async fn malformed_ids_are_reported_as_such() {
    let stack = test_stack();
    let app = actix_test::init_service(test_app(&stack)).await;
    let (_, token) = onboard(&app, "alice", "a@x.com").await;

    let response = actix_test::call_service(
        &app,
        friend_request(
            actix_test::TestRequest::post(),
            "not-a-uuid",
            &Uuid::new_v4().to_string(),
            &token,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("invalid_identifier")
    );
}

#[actix_web::test]
async fn friend_mutations_require_a_token() {
    let stack = test_stack();
    let app = actix_test::init_service(test_app(&stack)).await;
    let (alice, _) = onboard(&app, "alice", "a@x.com").await;
    let (bob, _) = onboard(&app, "bob", "b@x.com").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/users/{alice}/friends/{bob}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
