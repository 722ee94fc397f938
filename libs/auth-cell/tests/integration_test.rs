use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use auth_cell::router::auth_routes;
use shared_utils::jwt::validate_token;
use shared_utils::test_utils::TestConfig;

async fn create_test_app() -> Router {
    auth_routes(TestConfig::default().to_state().await)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_register_and_login_endpoints() {
    let app = create_test_app().await;

    let response = app
        .clone()
        .oneshot(post_json("/register", json!({ "username": "patient1", "password": "hunter22" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json("/login", json!({ "username": "patient1", "password": "hunter22" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_response = body_json(response).await;
    assert_eq!(json_response["user"]["username"], "patient1");
    assert_eq!(json_response["user"]["role"], "general_user");

    let token = json_response["token"].as_str().unwrap();
    let secret = TestConfig::default().jwt_secret;
    assert!(validate_token(token, &secret).is_ok());
}

#[tokio::test]
async fn test_register_ignores_requested_role() {
    let app = create_test_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/register",
            json!({ "username": "sneaky", "password": "hunter22", "role": "global_admin" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json("/login", json!({ "username": "sneaky", "password": "hunter22" })))
        .await
        .unwrap();
    let json_response = body_json(response).await;
    assert_eq!(json_response["user"]["role"], "general_user");
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let app = create_test_app().await;
    let body = json!({ "username": "twice", "password": "hunter22" });

    let first = app.clone().oneshot(post_json("/register", body.clone())).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(post_json("/register", body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_with_bad_password_is_unauthorized() {
    let app = create_test_app().await;
    app.clone()
        .oneshot(post_json("/register", json!({ "username": "erin", "password": "hunter22" })))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json("/login", json!({ "username": "erin", "password": "wrong-one" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json_response = body_json(response).await;
    assert_eq!(json_response["error"], "Invalid username or password");
}

#[tokio::test]
async fn test_register_validates_input() {
    let app = create_test_app().await;

    let response = app
        .oneshot(post_json("/register", json!({ "username": "", "password": "x" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
