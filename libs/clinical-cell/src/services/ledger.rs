use sqlx::SqlitePool;
use tracing::debug;

use shared_models::clinic::{Booking, OrderStatus, OrderWithPatient, RecordWithPatient};
use shared_utils::scope::PatientScope;

use crate::error::ClinicalError;
use crate::models::DashboardStats;

const ORDER_COLUMNS: &str = "o.id, o.booking_id, o.medicine_id, o.quantity, o.total_amount, \
                             o.status, o.created_at, o.updated_at, b.patient_name";

/// Read side of the clinic: queues, bills, history and totals.
pub struct LedgerService {
    pool: SqlitePool,
}

impl LedgerService {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Bookings awaiting diagnosis, oldest first. `doctor_id` narrows to one doctor's queue.
    pub async fn pending_queue(&self, doctor_id: Option<i64>) -> Result<Vec<Booking>, ClinicalError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE status = 'Pending' AND (? IS NULL OR doctor_id = ?) \
             ORDER BY created_at ASC, id ASC",
        )
        .bind(doctor_id)
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await?;

        debug!("{} bookings waiting (doctor filter: {:?})", bookings.len(), doctor_id);
        Ok(bookings)
    }

    pub async fn orders(
        &self,
        status: OrderStatus,
        scope: &PatientScope,
    ) -> Result<Vec<OrderWithPatient>, ClinicalError> {
        // Bills list newest first; receipts list by payment time.
        let (status_value, order_by) = match status {
            OrderStatus::Unpaid => ("Unpaid", "o.created_at DESC, o.id DESC"),
            OrderStatus::Paid => ("Paid", "o.updated_at DESC, o.id DESC"),
        };
        let sql = format!(
            "SELECT {} FROM orders o JOIN bookings b ON b.id = o.booking_id \
             WHERE o.status = ? AND (? IS NULL OR b.patient_name = ?) ORDER BY {}",
            ORDER_COLUMNS, order_by
        );

        let patient = scope.patient_name();
        let orders = sqlx::query_as::<_, OrderWithPatient>(&sql)
            .bind(status_value)
            .bind(patient)
            .bind(patient)
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    pub async fn medical_records(&self) -> Result<Vec<RecordWithPatient>, ClinicalError> {
        let records = sqlx::query_as::<_, RecordWithPatient>(
            "SELECT r.id, r.booking_id, b.patient_name, r.diagnosis, r.prescription, r.created_at \
             FROM medical_records r JOIN bookings b ON b.id = r.booking_id \
             ORDER BY r.created_at DESC, r.id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn stats(&self) -> Result<DashboardStats, ClinicalError> {
        let income: f64 = sqlx::query_scalar(
            "SELECT CAST(COALESCE(SUM(total_amount), 0) AS REAL) FROM orders WHERE status = 'Paid'",
        )
        .fetch_one(&self.pool)
        .await?;
        let patients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await?;
        let doctors: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'doctor'")
            .fetch_one(&self.pool)
            .await?;
        let meds: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medicines")
            .fetch_one(&self.pool)
            .await?;

        Ok(DashboardStats {
            income,
            patients,
            doctors,
            meds,
        })
    }
}
