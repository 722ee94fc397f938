use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BookingRequest {
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    #[validate(range(min = 0, max = 150, message = "age must be between 0 and 150"))]
    pub age: i64,
    #[serde(default)]
    pub gender: String,
    #[validate(length(min = 1, message = "department is required"))]
    pub department: String,
    #[serde(default)]
    pub doctor_id: Option<i64>,
}

/// Entry in the doctor picker shown at the booking desk.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DoctorSummary {
    pub id: i64,
    pub username: String,
    pub department: String,
}
