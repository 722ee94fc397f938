use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};
use validator::Validate;

use shared_database::AppState;
use shared_models::auth::{AuthUser, Capability};
use shared_models::error::AppError;
use shared_utils::extractor::require_capability;
use shared_utils::scope::PatientScope;

use crate::models::BookingRequest;
use crate::services::BookingService;

pub async fn get_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_capability(&user, Capability::ViewBookings)?;

    let scope = PatientScope::resolve(&state.pool, &user).await?;
    let bookings = BookingService::new(&state.pool).list_bookings(&scope).await?;

    Ok(Json(json!({ "data": bookings })))
}

pub async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<Value>, AppError> {
    require_capability(&user, Capability::CreateBooking)?;
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let scope = PatientScope::resolve(&state.pool, &user).await?;
    let booking = BookingService::new(&state.pool)
        .create_booking(request, &scope)
        .await?;

    Ok(Json(json!({ "message": "Booking created", "data": booking })))
}

pub async fn get_doctors(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_capability(&user, Capability::ViewBookings)?;

    let doctors = BookingService::new(&state.pool).list_doctors().await?;
    Ok(Json(json!({ "data": doctors })))
}
