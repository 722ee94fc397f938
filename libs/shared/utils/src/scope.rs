use sqlx::SqlitePool;

use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;

/// Which patients' rows a caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatientScope {
    All,
    /// Patients only see rows booked under their own username.
    Patient(String),
}

impl PatientScope {
    pub async fn resolve(pool: &SqlitePool, user: &AuthUser) -> Result<Self, AppError> {
        if user.role != Role::GeneralUser {
            return Ok(PatientScope::All);
        }

        let username: Option<String> = sqlx::query_scalar("SELECT username FROM users WHERE id = ?")
            .bind(user.id)
            .fetch_optional(pool)
            .await?;

        username
            .map(PatientScope::Patient)
            .ok_or_else(|| AppError::Auth("Unable to resolve current user".to_string()))
    }

    pub fn patient_name(&self) -> Option<&str> {
        match self {
            PatientScope::All => None,
            PatientScope::Patient(name) => Some(name),
        }
    }
}
