use anyhow::Context;
use dotenv::dotenv;
use sqlx::SqlitePool;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_cell::services::account::{AccountService, AuthError, NewUser};
use inventory_cell::models::AddMedicineRequest;
use inventory_cell::services::InventoryService;
use shared_config::AppConfig;
use shared_database::connect;
use shared_models::auth::Role;

const DEMO_ACCOUNTS: &[(&str, &str, Role, &str)] = &[
    ("admin", "admin123", Role::GlobalAdmin, "Administration"),
    ("doc001", "password123", Role::Doctor, "Internal Medicine"),
    ("money", "password123", Role::Finance, "Finance"),
];

const DEMO_MEDICINES: &[(&str, f64, i64)] = &[
    ("Amoxicillin", 12.5, 200),
    ("Ibuprofen", 8.0, 150),
    ("Paracetamol", 3.2, 300),
    ("Cough Syrup", 15.0, 80),
];

async fn seed_accounts(pool: &SqlitePool) -> anyhow::Result<()> {
    let accounts = AccountService::new(pool);
    for (username, password, role, department) in DEMO_ACCOUNTS {
        let user = NewUser::hash_then_construct(username, password, *role, 1, department)?;
        match accounts.create_user(user).await {
            Ok(id) => info!("Seeded {} ({}) as user {}", username, role, id),
            Err(AuthError::UsernameTaken(_)) => warn!("User {} already exists, skipping", username),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

async fn seed_medicines(pool: &SqlitePool) -> anyhow::Result<()> {
    let inventory = InventoryService::new(pool);
    let existing = inventory.list_medicines().await?;

    for (name, price, stock) in DEMO_MEDICINES {
        if existing.iter().any(|m| m.name == *name) {
            warn!("Medicine {} already exists, skipping", name);
            continue;
        }
        let request = AddMedicineRequest {
            name: name.to_string(),
            price: *price,
            stock: *stock,
        };
        inventory.add_medicine(&request, 1).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let pool = connect(&config)
        .await
        .with_context(|| format!("failed to open database at {}", config.database_url))?;

    seed_accounts(&pool).await.context("seeding accounts")?;
    seed_medicines(&pool).await.context("seeding medicines")?;

    info!("Seed complete");
    Ok(())
}
