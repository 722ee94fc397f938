use sqlx::SqlitePool;
use tracing::debug;

use crate::pool::begin_write;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        username      TEXT    NOT NULL UNIQUE,
        password_hash TEXT    NOT NULL,
        role          TEXT    NOT NULL,
        org_id        INTEGER NOT NULL DEFAULT 1,
        department    TEXT    NOT NULL DEFAULT '',
        created_at    TEXT    NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS medicines (
        id     INTEGER PRIMARY KEY AUTOINCREMENT,
        name   TEXT    NOT NULL,
        price  REAL    NOT NULL CHECK (price >= 0),
        stock  INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
        org_id INTEGER NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bookings (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        patient_name TEXT    NOT NULL,
        age          INTEGER NOT NULL DEFAULT 0,
        gender       TEXT    NOT NULL DEFAULT '',
        department   TEXT    NOT NULL,
        doctor_id    INTEGER NOT NULL,
        status       TEXT    NOT NULL DEFAULT 'Pending',
        created_at   TEXT    NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_bookings_status_doctor ON bookings (status, doctor_id)",
    r#"
    CREATE TABLE IF NOT EXISTS medical_records (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        booking_id   INTEGER NOT NULL UNIQUE REFERENCES bookings (id),
        diagnosis    TEXT    NOT NULL,
        prescription TEXT    NOT NULL,
        created_at   TEXT    NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        booking_id   INTEGER NOT NULL UNIQUE REFERENCES bookings (id),
        medicine_id  INTEGER REFERENCES medicines (id),
        quantity     INTEGER NOT NULL CHECK (quantity > 0),
        total_amount REAL    NOT NULL,
        status       TEXT    NOT NULL DEFAULT 'Unpaid',
        created_at   TEXT    NOT NULL,
        updated_at   TEXT    NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_orders_status ON orders (status)",
];

/// Creates any missing tables. Safe to run on every startup.
pub async fn apply(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = begin_write(pool).await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    debug!("Schema applied ({} statements)", STATEMENTS.len());
    Ok(())
}
