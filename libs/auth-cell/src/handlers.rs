use axum::extract::{Json, State};
use serde_json::{json, Value};
use tracing::debug;
use validator::Validate;

use shared_database::AppState;
use shared_models::auth::TokenResponse;
use shared_models::error::AppError;

use crate::models::{LoginRequest, RegisterRequest};
use crate::services::AccountService;

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    debug!("Login attempt for {}", request.username);

    let service = AccountService::new(&state.pool);
    let response = service
        .login(
            &request.username,
            &request.password,
            &state.config.jwt_secret,
            state.config.jwt_expire_hours,
        )
        .await?;

    Ok(Json(response))
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = AccountService::new(&state.pool);
    let id = service
        .register(&request.username, &request.password, request.department.as_deref())
        .await?;

    Ok(Json(json!({ "msg": "Registration successful", "id": id })))
}
