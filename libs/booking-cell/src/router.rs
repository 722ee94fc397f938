use axum::{middleware, routing::get, Router};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn booking_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/bookings",
            get(handlers::get_bookings).post(handlers::create_booking),
        )
        .route("/doctors", get(handlers::get_doctors))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
