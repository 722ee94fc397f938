use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum ClinicalError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Order {0} has already been paid")]
    AlreadySettled(i64),

    #[error("Booking {0} is not awaiting diagnosis")]
    BookingNotPending(i64),

    #[error("Insufficient stock for {medicine}: {available} available, {requested} requested")]
    InsufficientStock {
        medicine: String,
        available: i64,
        requested: i64,
    },

    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    #[error("Persistence failure: {0}")]
    InternalFailure(#[from] sqlx::Error),
}

impl ClinicalError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ClinicalError::NotFound { entity, id }
    }
}

impl From<ClinicalError> for AppError {
    fn from(err: ClinicalError) -> Self {
        match err {
            ClinicalError::NotFound { .. } => AppError::NotFound(err.to_string()),
            ClinicalError::AlreadySettled(_) | ClinicalError::BookingNotPending(_) => {
                AppError::Conflict(err.to_string())
            }
            ClinicalError::InsufficientStock { .. } => AppError::Unprocessable(err.to_string()),
            ClinicalError::InvalidQuantity(_) => AppError::ValidationError(err.to_string()),
            ClinicalError::InternalFailure(e) => AppError::Database(e.to_string()),
        }
    }
}
