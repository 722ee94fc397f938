use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, instrument};

use shared_database::begin_write;
use shared_models::clinic::Medicine;
use shared_models::error::AppError;

use crate::models::AddMedicineRequest;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Medicine {0} not found")]
    MedicineNotFound(i64),

    #[error("Restock amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::MedicineNotFound(_) => AppError::NotFound(err.to_string()),
            InventoryError::InvalidAmount(_) => AppError::ValidationError(err.to_string()),
            InventoryError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}

pub struct InventoryService {
    pool: SqlitePool,
}

impl InventoryService {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn list_medicines(&self) -> Result<Vec<Medicine>, InventoryError> {
        let medicines = sqlx::query_as::<_, Medicine>("SELECT * FROM medicines ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(medicines)
    }

    #[instrument(skip(self))]
    pub async fn add_medicine(
        &self,
        request: &AddMedicineRequest,
        org_id: i64,
    ) -> Result<Medicine, InventoryError> {
        let medicine = sqlx::query_as::<_, Medicine>(
            "INSERT INTO medicines (name, price, stock, org_id) VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(&request.name)
        .bind(request.price)
        .bind(request.stock)
        .bind(org_id)
        .fetch_one(&self.pool)
        .await?;

        info!("Medicine {} ({}) added with stock {}", medicine.id, medicine.name, medicine.stock);
        Ok(medicine)
    }

    /// Adds stock inside a transaction so it serializes with settlements taking stock out.
    #[instrument(skip(self))]
    pub async fn restock(&self, medicine_id: i64, amount: i64) -> Result<Medicine, InventoryError> {
        if amount <= 0 {
            return Err(InventoryError::InvalidAmount(amount));
        }

        let mut tx = begin_write(&self.pool).await?;

        let updated = sqlx::query("UPDATE medicines SET stock = stock + ? WHERE id = ?")
            .bind(amount)
            .bind(medicine_id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() != 1 {
            return Err(InventoryError::MedicineNotFound(medicine_id));
        }

        let medicine = sqlx::query_as::<_, Medicine>("SELECT * FROM medicines WHERE id = ?")
            .bind(medicine_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Medicine {} restocked by {}, now {}", medicine.id, amount, medicine.stock);
        Ok(medicine)
    }
}
