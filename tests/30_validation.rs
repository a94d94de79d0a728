//! Boundary-validation behavior, exercised in-process against the router.
//! None of these paths reach storage: validation and identifier parsing
//! reject before any database call, so they hold with or without a database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use devnet_api::auth::{generate_jwt, Claims};
use devnet_api::server::app;

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.expect("router response");
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };

    (status, body)
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    let token = generate_jwt(Claims::new(uuid::Uuid::new_v4())).expect("token");
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-auth-token", token)
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let request = Request::builder()
        .uri("/profile/me")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["message"], "No token, authorisation denied");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let request = Request::builder()
        .uri("/profile/me")
        .header("x-auth-token", "not.a.token")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token is not valid");
}

#[tokio::test]
async fn registration_rejects_empty_payload() {
    let (status, body) = send(json_request(Method::POST, "/users", &json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["name"], "A name is required");
    assert_eq!(body["field_errors"]["email"], "Please fill in a valid email");
    assert_eq!(
        body["field_errors"]["password"],
        "Password must be at least 6 characters"
    );
}

#[tokio::test]
async fn registration_rejects_short_password() {
    let payload = json!({
        "name": "Dev",
        "email": "dev@example.com",
        "password": "12345"
    });

    let (status, body) = send(json_request(Method::POST, "/users", &payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["password"].is_string());
    assert!(body["field_errors"].get("name").is_none());
}

#[tokio::test]
async fn login_requires_credentials() {
    let (status, body) = send(json_request(Method::POST, "/auth", &json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["email"].is_string());
    assert!(body["field_errors"]["password"].is_string());
}

#[tokio::test]
async fn malformed_profile_user_id_is_a_distinct_error() {
    let request = Request::builder()
        .uri("/profile/user/not-a-uuid")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_IDENTIFIER");
}

#[tokio::test]
async fn profile_update_requires_status_and_skills() {
    let (status, body) = send(authed_json_request(Method::POST, "/profile", &json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["status"], "Status is required");
    assert_eq!(body["field_errors"]["skills"], "Skills is required");
}

#[tokio::test]
async fn experience_requires_title_company_and_from() {
    let (status, body) = send(authed_json_request(
        Method::POST,
        "/profile/experience",
        &json!({}),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["title"], "Title is required");
    assert_eq!(body["field_errors"]["company"], "Company is required");
    assert_eq!(body["field_errors"]["from"], "From date is required");
}

#[tokio::test]
async fn malformed_experience_id_is_rejected_before_storage() {
    let (status, body) = send(authed_json_request(
        Method::PUT,
        "/profile/experience/not-a-uuid",
        &json!({}),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_IDENTIFIER");

    let (status, body) = send(authed_json_request(
        Method::DELETE,
        "/profile/experience/also-not-a-uuid",
        &json!({}),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_IDENTIFIER");
}
