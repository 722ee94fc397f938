use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use shared_database::begin_write;
use shared_models::clinic::{Booking, Medicine};

use crate::error::ClinicalError;
use crate::models::RecordRequest;
use crate::services::guards;

pub struct DiagnosisService {
    pool: SqlitePool,
}

impl DiagnosisService {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Records a diagnosis, completes the booking and raises the bill, all in one transaction.
    ///
    /// Returns the id of the new unpaid order. A failure at any step drops the
    /// transaction uncommitted and leaves nothing behind.
    #[instrument(skip(self, request), fields(booking_id = request.booking_id, medicine_id = request.medicine_id))]
    pub async fn record_diagnosis_and_bill(&self, request: &RecordRequest) -> Result<i64, ClinicalError> {
        guards::ensure_positive_quantity(request.quantity)?;

        let mut tx = begin_write(&self.pool).await?;

        let medicine = sqlx::query_as::<_, Medicine>("SELECT * FROM medicines WHERE id = ?")
            .bind(request.medicine_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ClinicalError::not_found("Medicine", request.medicine_id))?;

        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(request.booking_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ClinicalError::not_found("Booking", request.booking_id))?;
        guards::ensure_pending(&booking)?;

        let now = Utc::now();
        let prescription = guards::prescription_text(&medicine.name, request.quantity);

        sqlx::query(
            "INSERT INTO medical_records (booking_id, diagnosis, prescription, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(booking.id)
        .bind(&request.diagnosis)
        .bind(&prescription)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let completed = sqlx::query(
            "UPDATE bookings SET status = 'Completed' WHERE id = ? AND status = 'Pending'",
        )
        .bind(booking.id)
        .execute(&mut *tx)
        .await?;
        if completed.rows_affected() != 1 {
            return Err(ClinicalError::BookingNotPending(booking.id));
        }

        let total_amount = guards::order_total(medicine.price, request.quantity);
        let order_id = sqlx::query(
            "INSERT INTO orders (booking_id, medicine_id, quantity, total_amount, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, 'Unpaid', ?, ?)",
        )
        .bind(booking.id)
        .bind(medicine.id)
        .bind(request.quantity)
        .bind(total_amount)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        debug!("{} for booking {}", prescription, booking.id);
        info!(
            "Diagnosis recorded for booking {}, order {} raised for {:.2}",
            booking.id, order_id, total_amount
        );
        Ok(order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_database::connect_in_memory;
    use shared_models::auth::Role;
    use shared_models::clinic::{BookingStatus, MedicalRecord, Order, OrderStatus};
    use shared_utils::test_utils::Fixtures;

    fn request(booking_id: i64, medicine_id: i64, quantity: i64) -> RecordRequest {
        RecordRequest {
            booking_id,
            diagnosis: "Acute sinusitis".to_string(),
            medicine_id,
            quantity,
        }
    }

    async fn booking_status(pool: &SqlitePool, id: i64) -> BookingStatus {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap()
            .status
    }

    #[tokio::test]
    async fn test_diagnosis_creates_record_order_and_completes_booking() {
        let pool = connect_in_memory().await.unwrap();
        let doctor = Fixtures::user(&pool, "doc001", Role::Doctor).await;
        let booking = Fixtures::booking(&pool, "Li Lei", doctor).await;
        let medicine = Fixtures::medicine(&pool, "Amoxicillin", 10.0, 50).await;

        let order_id = DiagnosisService::new(&pool)
            .record_diagnosis_and_bill(&request(booking, medicine, 3))
            .await
            .unwrap();

        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
            .bind(order_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(order.total_amount, 30.0);
        assert_eq!(order.status, OrderStatus::Unpaid);
        assert_eq!(order.quantity, 3);
        assert_eq!(order.medicine_id, Some(medicine));
        assert_eq!(order.booking_id, booking);

        let record = sqlx::query_as::<_, MedicalRecord>("SELECT * FROM medical_records WHERE booking_id = ?")
            .bind(booking)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(record.prescription, "Rx: Amoxicillin x 3");
        assert_eq!(record.diagnosis, "Acute sinusitis");

        assert_eq!(booking_status(&pool, booking).await, BookingStatus::Completed);
        assert_eq!(Fixtures::count(&pool, "orders").await, 1);
        // prescribing does not reserve stock
        assert_eq!(Fixtures::stock_of(&pool, medicine).await, 50);
    }

    #[tokio::test]
    async fn test_unknown_medicine_leaves_no_trace() {
        let pool = connect_in_memory().await.unwrap();
        let booking = Fixtures::booking(&pool, "Han Meimei", 1).await;

        let result = DiagnosisService::new(&pool)
            .record_diagnosis_and_bill(&request(booking, 999, 1))
            .await;

        assert_matches!(result, Err(ClinicalError::NotFound { entity: "Medicine", id: 999 }));
        assert_eq!(Fixtures::count(&pool, "medical_records").await, 0);
        assert_eq!(Fixtures::count(&pool, "orders").await, 0);
        assert_eq!(booking_status(&pool, booking).await, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_booking_is_not_found() {
        let pool = connect_in_memory().await.unwrap();
        let medicine = Fixtures::medicine(&pool, "Ibuprofen", 4.0, 10).await;

        let result = DiagnosisService::new(&pool)
            .record_diagnosis_and_bill(&request(42, medicine, 1))
            .await;

        assert_matches!(result, Err(ClinicalError::NotFound { entity: "Booking", id: 42 }));
        assert_eq!(Fixtures::count(&pool, "medical_records").await, 0);
    }

    #[tokio::test]
    async fn test_second_submission_is_rejected() {
        let pool = connect_in_memory().await.unwrap();
        let booking = Fixtures::booking(&pool, "Li Lei", 1).await;
        let medicine = Fixtures::medicine(&pool, "Ibuprofen", 4.0, 10).await;
        let service = DiagnosisService::new(&pool);

        service.record_diagnosis_and_bill(&request(booking, medicine, 1)).await.unwrap();
        let second = service.record_diagnosis_and_bill(&request(booking, medicine, 2)).await;

        assert_matches!(second, Err(ClinicalError::BookingNotPending(id)) if id == booking);
        assert_eq!(Fixtures::count(&pool, "orders").await, 1);
        assert_eq!(Fixtures::count(&pool, "medical_records").await, 1);
    }

    #[tokio::test]
    async fn test_non_positive_quantity_is_rejected() {
        let pool = connect_in_memory().await.unwrap();
        let booking = Fixtures::booking(&pool, "Li Lei", 1).await;
        let medicine = Fixtures::medicine(&pool, "Ibuprofen", 4.0, 10).await;

        let result = DiagnosisService::new(&pool)
            .record_diagnosis_and_bill(&request(booking, medicine, 0))
            .await;

        assert_matches!(result, Err(ClinicalError::InvalidQuantity(0)));
        assert_eq!(booking_status(&pool, booking).await, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_order_insert_fault_rolls_back_record_and_status() {
        let pool = connect_in_memory().await.unwrap();
        let booking = Fixtures::booking(&pool, "Li Lei", 1).await;
        let medicine = Fixtures::medicine(&pool, "Ibuprofen", 4.0, 10).await;

        sqlx::query(
            "CREATE TRIGGER fail_order_insert BEFORE INSERT ON orders \
             BEGIN SELECT RAISE(ABORT, 'simulated fault'); END",
        )
        .execute(&pool)
        .await
        .unwrap();

        let result = DiagnosisService::new(&pool)
            .record_diagnosis_and_bill(&request(booking, medicine, 2))
            .await;

        assert_matches!(result, Err(ClinicalError::InternalFailure(_)));
        assert_eq!(Fixtures::count(&pool, "medical_records").await, 0);
        assert_eq!(Fixtures::count(&pool, "orders").await, 0);
        assert_eq!(booking_status(&pool, booking).await, BookingStatus::Pending);
    }
}
