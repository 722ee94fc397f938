use serde::{Deserialize, Serialize};
use validator::Validate;

/// Doctor's diagnosis submission; one per booking.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordRequest {
    pub booking_id: i64,
    #[validate(length(min = 1, message = "diagnosis is required"))]
    pub diagnosis: String,
    pub medicine_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub order_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub income: f64,
    pub patients: i64,
    pub doctors: i64,
    pub meds: i64,
}
