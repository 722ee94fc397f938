use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};
use validator::Validate;

use shared_database::AppState;
use shared_models::auth::{AuthUser, Capability, Role};
use shared_models::clinic::OrderStatus;
use shared_models::error::AppError;
use shared_utils::extractor::require_capability;
use shared_utils::scope::PatientScope;

use crate::models::{PaymentRequest, RecordRequest};
use crate::services::{DiagnosisService, LedgerService, SettlementService};

pub async fn get_pending_patients(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_capability(&user, Capability::Diagnose)?;

    // Doctors work their own queue; admins oversee every queue.
    let doctor_filter = (user.role == Role::Doctor).then_some(user.id);
    let bookings = LedgerService::new(&state.pool).pending_queue(doctor_filter).await?;

    Ok(Json(json!({ "data": bookings })))
}

pub async fn submit_medical_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<RecordRequest>,
) -> Result<Json<Value>, AppError> {
    require_capability(&user, Capability::Diagnose)?;
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let order_id = DiagnosisService::new(&state.pool)
        .record_diagnosis_and_bill(&request)
        .await?;

    Ok(Json(json!({
        "msg": "Diagnosis recorded, bill generated",
        "order_id": order_id
    })))
}

pub async fn get_medical_records(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_capability(&user, Capability::ViewRecords)?;

    let records = LedgerService::new(&state.pool).medical_records().await?;
    Ok(Json(json!({ "data": records })))
}

pub async fn get_unpaid_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    list_orders(state, user, OrderStatus::Unpaid).await
}

pub async fn get_paid_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    list_orders(state, user, OrderStatus::Paid).await
}

async fn list_orders(state: AppState, user: AuthUser, status: OrderStatus) -> Result<Json<Value>, AppError> {
    require_capability(&user, Capability::ViewOrders)?;

    let scope = PatientScope::resolve(&state.pool, &user).await?;
    let orders = LedgerService::new(&state.pool).orders(status, &scope).await?;

    Ok(Json(json!({ "data": orders })))
}

pub async fn confirm_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<Value>, AppError> {
    require_capability(&user, Capability::SettlePayment)?;

    SettlementService::new(&state.pool)
        .settle_payment(request.order_id)
        .await?;

    Ok(Json(json!({ "msg": "Payment confirmed, stock updated" })))
}

pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_capability(&user, Capability::ViewStats)?;

    let stats = LedgerService::new(&state.pool).stats().await?;
    Ok(Json(json!(stats)))
}
