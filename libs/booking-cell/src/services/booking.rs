use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument};

use shared_models::clinic::Booking;
use shared_models::error::AppError;
use shared_utils::scope::PatientScope;

use crate::models::{BookingRequest, DoctorSummary};

/// Walk-ins with no doctor chosen go to the duty doctor.
pub const DEFAULT_DOCTOR_ID: i64 = 1;

pub struct BookingService {
    pool: SqlitePool,
}

impl BookingService {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    #[instrument(skip(self, request))]
    pub async fn create_booking(
        &self,
        request: BookingRequest,
        scope: &PatientScope,
    ) -> Result<Booking, AppError> {
        // Patients always book for themselves; the desk books on behalf of someone else.
        let patient_name = match scope {
            PatientScope::Patient(name) => name.clone(),
            PatientScope::All => {
                let name = request.patient_name.trim();
                if name.is_empty() {
                    return Err(AppError::ValidationError(
                        "patient_name is required when booking for a patient".to_string(),
                    ));
                }
                name.to_string()
            }
        };

        let doctor_id = request
            .doctor_id
            .filter(|id| *id > 0)
            .unwrap_or(DEFAULT_DOCTOR_ID);

        let booking = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (patient_name, age, gender, department, doctor_id, status, created_at) \
             VALUES (?, ?, ?, ?, ?, 'Pending', ?) RETURNING *",
        )
        .bind(&patient_name)
        .bind(request.age)
        .bind(&request.gender)
        .bind(&request.department)
        .bind(doctor_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!("Booking {} created for {} with doctor {}", booking.id, patient_name, doctor_id);
        Ok(booking)
    }

    pub async fn list_bookings(&self, scope: &PatientScope) -> Result<Vec<Booking>, AppError> {
        let patient = scope.patient_name();
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE (? IS NULL OR patient_name = ?) \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(patient)
        .bind(patient)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    pub async fn list_doctors(&self) -> Result<Vec<DoctorSummary>, AppError> {
        let doctors = sqlx::query_as::<_, DoctorSummary>(
            "SELECT id, username, department FROM users WHERE role = 'doctor' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(doctors)
    }
}
