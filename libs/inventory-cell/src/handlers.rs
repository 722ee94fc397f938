use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use validator::Validate;

use shared_database::AppState;
use shared_models::auth::{AuthUser, Capability};
use shared_models::error::AppError;
use shared_utils::extractor::require_capability;

use crate::models::{AddMedicineRequest, RestockRequest};
use crate::services::InventoryService;

pub async fn get_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    require_capability(&user, Capability::ViewInventory)?;

    let medicines = InventoryService::new(&state.pool).list_medicines().await?;
    Ok(Json(json!({ "data": medicines })))
}

pub async fn add_medicine(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<AddMedicineRequest>,
) -> Result<Json<Value>, AppError> {
    require_capability(&user, Capability::ManageInventory)?;
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let medicine = InventoryService::new(&state.pool)
        .add_medicine(&request, user.org_id)
        .await?;

    Ok(Json(json!({ "msg": "Medicine added", "data": medicine })))
}

pub async fn restock_medicine(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(medicine_id): Path<i64>,
    Json(request): Json<RestockRequest>,
) -> Result<Json<Value>, AppError> {
    require_capability(&user, Capability::ManageInventory)?;
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let medicine = InventoryService::new(&state.pool)
        .restock(medicine_id, request.amount)
        .await?;

    Ok(Json(json!({ "msg": "Stock updated", "data": medicine })))
}
