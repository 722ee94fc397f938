use std::path::Path;

use chrono::Utc;
use sqlx::SqlitePool;

use shared_config::AppConfig;
use shared_database::{connect, connect_in_memory, AppState};
use shared_models::auth::{AuthUser, Role};

use crate::jwt::issue_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub jwt_expire_hours: i64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            jwt_expire_hours: 24,
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            jwt_secret: self.jwt_secret.clone(),
            jwt_expire_hours: self.jwt_expire_hours,
            server_port: 0,
        }
    }

    /// State backed by a fresh in-memory database.
    pub async fn to_state(&self) -> AppState {
        let pool = connect_in_memory()
            .await
            .expect("in-memory database should open");
        AppState::new(self.to_app_config(), pool)
    }

    /// State backed by a WAL database file under `dir`, opened the same way the server
    /// opens it. Unlike the in-memory pool, connections here really run concurrently.
    pub async fn to_file_state(&self, dir: &Path) -> AppState {
        let config = AppConfig {
            database_url: format!("sqlite://{}", dir.join("hospital.db").display()),
            database_max_connections: 5,
            ..self.to_app_config()
        };
        let pool = connect(&config)
            .await
            .expect("file database should open");
        AppState::new(config, pool)
    }
}

pub struct TestUser {
    pub id: i64,
    pub role: Role,
}

impl TestUser {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    pub fn doctor(id: i64) -> Self {
        Self::new(id, Role::Doctor)
    }

    pub fn cashier(id: i64) -> Self {
        Self::new(id, Role::Finance)
    }

    pub fn admin(id: i64) -> Self {
        Self::new(id, Role::GlobalAdmin)
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id,
            role: self.role,
            org_id: 1,
        }
    }

    pub fn bearer(&self, secret: &str) -> String {
        let token = issue_token(self.id, self.role, 1, secret, 1)
            .expect("test token should sign");
        format!("Bearer {}", token)
    }
}

/// Direct inserts for arranging test data without going through the services.
pub struct Fixtures;

impl Fixtures {
    pub async fn user(pool: &SqlitePool, username: &str, role: Role) -> i64 {
        sqlx::query(
            "INSERT INTO users (username, password_hash, role, org_id, department, created_at) \
             VALUES (?, 'not-a-real-hash', ?, 1, '', ?)",
        )
        .bind(username)
        .bind(role.as_str())
        .bind(Utc::now())
        .execute(pool)
        .await
        .expect("fixture user insert")
        .last_insert_rowid()
    }

    pub async fn medicine(pool: &SqlitePool, name: &str, price: f64, stock: i64) -> i64 {
        sqlx::query("INSERT INTO medicines (name, price, stock, org_id) VALUES (?, ?, ?, 1)")
            .bind(name)
            .bind(price)
            .bind(stock)
            .execute(pool)
            .await
            .expect("fixture medicine insert")
            .last_insert_rowid()
    }

    pub async fn booking(pool: &SqlitePool, patient_name: &str, doctor_id: i64) -> i64 {
        sqlx::query(
            "INSERT INTO bookings (patient_name, age, gender, department, doctor_id, status, created_at) \
             VALUES (?, 30, 'F', 'General', ?, 'Pending', ?)",
        )
        .bind(patient_name)
        .bind(doctor_id)
        .bind(Utc::now())
        .execute(pool)
        .await
        .expect("fixture booking insert")
        .last_insert_rowid()
    }

    pub async fn stock_of(pool: &SqlitePool, medicine_id: i64) -> i64 {
        sqlx::query_scalar("SELECT stock FROM medicines WHERE id = ?")
            .bind(medicine_id)
            .fetch_one(pool)
            .await
            .expect("fixture stock lookup")
    }

    pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .expect("fixture count")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::validate_token;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default().to_app_config();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(config.is_configured());
    }

    #[test]
    fn test_bearer_header_is_valid() {
        let config = TestConfig::default();
        let header = TestUser::doctor(5).bearer(&config.jwt_secret);
        let token = header.strip_prefix("Bearer ").unwrap();

        let user = validate_token(token, &config.jwt_secret).unwrap();
        assert_eq!(user.id, 5);
        assert_eq!(user.role, Role::Doctor);
    }

    #[tokio::test]
    async fn test_fixtures_insert_rows() {
        let state = TestConfig::default().to_state().await;
        let med = Fixtures::medicine(&state.pool, "Aspirin", 2.5, 10).await;

        assert_eq!(Fixtures::stock_of(&state.pool, med).await, 10);
        assert_eq!(Fixtures::count(&state.pool, "medicines").await, 1);
    }
}
