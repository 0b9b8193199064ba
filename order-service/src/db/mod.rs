//! PostgreSQL connection management, migrations and default-user seeding.

use crate::config::{DatabaseConfig, SeedUserConfig};
use crate::utils::{hash_password, Password};
use secrecy::{ExposeSecret, Secret};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Which of the two pools is being opened; only used for logging.
#[derive(Debug, Clone, Copy)]
pub enum PoolRole {
    Read,
    Write,
}

/// Create a PostgreSQL connection pool.
pub async fn create_pool(
    url: &Secret<String>,
    config: &DatabaseConfig,
    role: PoolRole,
) -> Result<PgPool, sqlx::Error> {
    tracing::info!(?role, "Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(url.expose_secret())
        .await?;

    tracing::info!(?role, "Successfully connected to PostgreSQL");

    Ok(pool)
}

/// Run database migrations against the write database.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}

pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Insert the configured default user unless the email already exists.
///
/// Returns `true` when a row was created.
pub async fn seed_default_user(pool: &PgPool, seed: &SeedUserConfig) -> Result<bool, anyhow::Error> {
    let hash = hash_password(&Password::new(seed.password.expose_secret().clone()))?;

    let result = sqlx::query(
        "INSERT INTO users (email, password) VALUES ($1, $2) ON CONFLICT (email) DO NOTHING",
    )
    .bind(&seed.email)
    .bind(hash.as_str())
    .execute(pool)
    .await?;

    let created = result.rows_affected() > 0;
    if created {
        tracing::info!(email = %seed.email, "Seeded default user");
    } else {
        tracing::debug!(email = %seed.email, "Default user already present");
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[tokio::test]
    #[ignore] // Requires running PostgreSQL
    async fn test_create_pool_and_seed_is_idempotent() {
        let config = test_config("secret");
        let pool = create_pool(&config.database.write_url, &config.database, PoolRole::Write)
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();

        seed_default_user(&pool, &config.seed_user).await.unwrap();
        assert!(!seed_default_user(&pool, &config.seed_user).await.unwrap());
        assert!(health_check(&pool).await.is_ok());
    }
}
