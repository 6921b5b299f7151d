//! Pool construction and schema migrations

use anyhow::{Context, Result};
use keepsake_core::Config;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;

const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Connect to the metadata database and bring its schema up to date.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url()
        .context("DATABASE_URL is not configured")?;

    let start = std::time::Instant::now();
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .connect(database_url)
        .await
        .context("Failed to connect to the metadata database")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Metadata database connected"
    );

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Apply pending migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = Migrator::new(dir.clone())
        .await
        .with_context(|| format!("Failed to load migrations from {}", dir.display()))?;

    migrator
        .run(pool)
        .await
        .context("Failed to apply uploads schema migrations")?;

    tracing::info!(migrations = migrator.iter().count(), "Uploads schema up to date");
    Ok(())
}
