use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn storehouse_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/storehouse",
            get(handlers::get_inventory).post(handlers::add_medicine),
        )
        .route("/storehouse/{id}/restock", post(handlers::restock_medicine))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
