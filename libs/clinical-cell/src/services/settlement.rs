use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

use shared_database::begin_write;
use shared_models::clinic::{Medicine, Order};

use crate::error::ClinicalError;
use crate::services::guards;

pub struct SettlementService {
    pool: SqlitePool,
}

impl SettlementService {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Marks an order paid and takes its medicine out of stock.
    ///
    /// Both writes are guarded updates inside one transaction: the status flip only
    /// matches an unpaid row and the decrement only matches a row with enough stock,
    /// so a concurrent settlement can never pay twice or push stock below zero.
    #[instrument(skip(self))]
    pub async fn settle_payment(&self, order_id: i64) -> Result<(), ClinicalError> {
        let mut tx = begin_write(&self.pool).await?;

        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
            .bind(order_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ClinicalError::not_found("Order", order_id))?;
        guards::ensure_unpaid(&order)?;

        let flipped = sqlx::query(
            "UPDATE orders SET status = 'Paid', updated_at = ? WHERE id = ? AND status = 'Unpaid'",
        )
        .bind(Utc::now())
        .bind(order.id)
        .execute(&mut *tx)
        .await?;
        if flipped.rows_affected() != 1 {
            warn!("Order {} was settled concurrently", order.id);
            return Err(ClinicalError::AlreadySettled(order.id));
        }

        if let Some(medicine_id) = order.medicine_id {
            let medicine = sqlx::query_as::<_, Medicine>("SELECT * FROM medicines WHERE id = ?")
                .bind(medicine_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| ClinicalError::not_found("Medicine", medicine_id))?;
            guards::ensure_stock(&medicine, order.quantity)?;

            let taken = sqlx::query(
                "UPDATE medicines SET stock = stock - ? WHERE id = ? AND stock >= ?",
            )
            .bind(order.quantity)
            .bind(medicine.id)
            .bind(order.quantity)
            .execute(&mut *tx)
            .await?;
            if taken.rows_affected() != 1 {
                return Err(ClinicalError::InsufficientStock {
                    medicine: medicine.name,
                    available: medicine.stock,
                    requested: order.quantity,
                });
            }
        }

        tx.commit().await?;

        info!("Order {} settled ({:.2})", order.id, order.total_amount);
        Ok(())
    }
}
