use std::env;
use tracing::warn;

/// Upper bound on token lifetime: one year.
pub const MAX_JWT_EXPIRE_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expire_hours: i64,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_URL not set, using default");
                    "sqlite://storage/db/hospital.db".to_string()
                }),
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            jwt_expire_hours: token_lifetime(parse_or("JWT_EXPIRE_HOURS", 24)),
            server_port: parse_or("SERVER_PORT", 8080),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.database_url.is_empty() && !self.jwt_secret.is_empty()
    }
}

fn token_lifetime(hours: i64) -> i64 {
    let clamped = hours.clamp(1, MAX_JWT_EXPIRE_HOURS);
    if clamped != hours {
        warn!("JWT_EXPIRE_HOURS={} is out of range, using {}", hours, clamped);
    }
    clamped
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value '{}', using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}
