use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use shared_models::auth::{Role, SessionUser, TokenResponse};
use shared_models::clinic::User;
use shared_models::error::AppError;
use shared_utils::jwt::issue_token;

use super::password::PasswordService;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("Stored role is not recognised: {0}")]
    CorruptRole(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token generation failed: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
            AuthError::UsernameTaken(_) => AppError::Conflict(err.to_string()),
            AuthError::CorruptRole(_) | AuthError::Hashing(_) | AuthError::Token(_) => {
                AppError::Internal(err.to_string())
            }
            AuthError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}

/// A user that is ready to insert. The only way to build one is through
/// [`NewUser::hash_then_construct`], so a plaintext password can never reach the table.
#[derive(Debug, Clone)]
pub struct NewUser {
    username: String,
    password_hash: String,
    role: Role,
    org_id: i64,
    department: String,
}

impl NewUser {
    pub fn hash_then_construct(
        username: &str,
        password: &str,
        role: Role,
        org_id: i64,
        department: &str,
    ) -> Result<Self, AuthError> {
        let password_hash = PasswordService::hash_password(password)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        Ok(Self {
            username: username.to_string(),
            password_hash,
            role,
            org_id,
            department: department.to_string(),
        })
    }
}

pub struct AccountService {
    pool: SqlitePool,
}

impl AccountService {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn create_user(&self, user: NewUser) -> Result<i64, AuthError> {
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, role, org_id, department, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.org_id)
        .bind(&user.department)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => {
                info!("Created user {} as {}", user.username, user.role);
                Ok(done.last_insert_rowid())
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AuthError::UsernameTaken(user.username))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Self-registration always lands in the patient role of the main organization.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        department: Option<&str>,
    ) -> Result<i64, AuthError> {
        let user = NewUser::hash_then_construct(
            username,
            password,
            Role::GeneralUser,
            1,
            department.unwrap_or_default(),
        )?;
        self.create_user(user).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    #[instrument(skip(self, password, jwt_secret))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        jwt_secret: &str,
        expire_hours: i64,
    ) -> Result<TokenResponse, AuthError> {
        let Some(user) = self.find_by_username(username).await? else {
            debug!("Login for unknown user {}", username);
            return Err(AuthError::InvalidCredentials);
        };

        let verified = PasswordService::verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        if !verified {
            warn!("Password mismatch for user {}", username);
            return Err(AuthError::InvalidCredentials);
        }

        let role: Role = user
            .role
            .parse()
            .map_err(|_| AuthError::CorruptRole(user.role.clone()))?;

        let token = issue_token(user.id, role, user.org_id, jwt_secret, expire_hours)
            .map_err(AuthError::Token)?;

        info!("User {} logged in", username);
        Ok(TokenResponse {
            token,
            user: SessionUser {
                id: user.id,
                username: user.username,
                role: role.as_str().to_string(),
            },
        })
    }
}
