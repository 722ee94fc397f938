use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum BookingStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum OrderStatus {
    Unpaid,
    Paid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub org_id: i64,
    pub department: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub patient_name: String,
    pub age: i64,
    pub gender: String,
    pub department: String,
    pub doctor_id: i64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Medicine {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub org_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MedicalRecord {
    pub id: i64,
    pub booking_id: i64,
    pub diagnosis: String,
    pub prescription: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub booking_id: i64,
    pub medicine_id: Option<i64>,
    pub quantity: i64,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order together with the patient it bills.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderWithPatient {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: Order,
    pub patient_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecordWithPatient {
    pub id: i64,
    pub booking_id: i64,
    pub patient_name: String,
    pub diagnosis: String,
    pub prescription: String,
    pub created_at: DateTime<Utc>,
}
