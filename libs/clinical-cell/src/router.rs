use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn clinical_routes(state: AppState) -> Router {
    Router::new()
        // Doctor workbench
        .route("/doctor/patients", get(handlers::get_pending_patients))
        .route("/doctor/records", post(handlers::submit_medical_record))
        // Record history
        .route("/record", get(handlers::get_medical_records))
        // Cashier desk
        .route(
            "/payment",
            get(handlers::get_unpaid_orders).post(handlers::confirm_payment),
        )
        .route("/payment/history", get(handlers::get_paid_orders))
        .route("/stats", get(handlers::get_dashboard_stats))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
