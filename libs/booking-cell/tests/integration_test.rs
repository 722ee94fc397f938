use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use booking_cell::router::booking_routes;
use shared_database::AppState;
use shared_models::auth::Role;
use shared_utils::test_utils::{Fixtures, TestConfig, TestUser};

async fn create_test_app() -> (Router, AppState, String) {
    let config = TestConfig::default();
    let state = config.to_state().await;
    (booking_routes(state.clone()), state, config.jwt_secret)
}

fn request(method: &str, uri: &str, bearer: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", bearer)
        .header("content-type", "application/json");
    match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_registration_desk_creates_and_lists_bookings() {
    let (app, _state, secret) = create_test_app().await;
    let desk = TestUser::new(2, Role::Registration).bearer(&secret);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/bookings",
            &desk,
            Some(json!({ "patient_name": "Zhao Liu", "age": 60, "gender": "M", "department": "Cardiology", "doctor_id": 5 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["data"]["status"], "Pending");
    assert_eq!(created["data"]["doctor_id"], 5);

    let response = app.oneshot(request("GET", "/bookings", &desk, None)).await.unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["patient_name"], "Zhao Liu");
}

#[tokio::test]
async fn test_patient_books_under_own_name() {
    let (app, state, secret) = create_test_app().await;
    let patient_id = Fixtures::user(&state.pool, "li.lei", Role::GeneralUser).await;
    Fixtures::booking(&state.pool, "han.meimei", 1).await;
    let patient = TestUser::new(patient_id, Role::GeneralUser).bearer(&secret);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/bookings",
            &patient,
            Some(json!({ "patient_name": "han.meimei", "department": "ENT" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["patient_name"], "li.lei");

    let response = app.oneshot(request("GET", "/bookings", &patient, None)).await.unwrap();
    let listed = body_json(response).await;
    let listed = listed["data"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["patient_name"], "li.lei");
}

#[tokio::test]
async fn test_department_is_required() {
    let (app, _state, secret) = create_test_app().await;
    let desk = TestUser::new(2, Role::Registration).bearer(&secret);

    let response = app
        .oneshot(request(
            "POST",
            "/bookings",
            &desk,
            Some(json!({ "patient_name": "Zhao Liu", "department": "" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_storekeeper_cannot_touch_bookings() {
    let (app, _state, secret) = create_test_app().await;
    let storekeeper = TestUser::new(3, Role::Storekeeper).bearer(&secret);

    let response = app.oneshot(request("GET", "/bookings", &storekeeper, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_doctor_directory_endpoint() {
    let (app, state, secret) = create_test_app().await;
    Fixtures::user(&state.pool, "doc001", Role::Doctor).await;
    let desk = TestUser::new(2, Role::Registration).bearer(&secret);

    let response = app.oneshot(request("GET", "/doctors", &desk, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let doctors = body_json(response).await;
    assert_eq!(doctors["data"][0]["username"], "doc001");
    assert!(doctors["data"][0].get("password_hash").is_none());
}
