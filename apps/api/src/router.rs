use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use auth_cell::router::auth_routes;
use booking_cell::router::booking_routes;
use clinical_cell::router::clinical_routes;
use inventory_cell::router::storehouse_routes;
use shared_database::AppState;

async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

pub fn create_router(state: AppState) -> Router {
    let dashboard = Router::new()
        .merge(booking_routes(state.clone()))
        .merge(clinical_routes(state.clone()))
        .merge(storehouse_routes(state.clone()));

    Router::new()
        .route("/ping", get(ping))
        .nest("/api/v1", auth_routes(state))
        .nest("/api/v1/dashboard", dashboard)
}
