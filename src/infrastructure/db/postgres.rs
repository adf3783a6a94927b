use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

pub async fn create_pool(database_url: &str, max_retries: u32) -> Result<PgPool, sqlx::Error> {
    let mut retry_count = 0;
    let mut wait_seconds = 1;

    loop {
        match pool_options().connect(database_url).await {
            Ok(pool) => {
                info!("Database connection established.");
                return Ok(pool);
            }
            Err(e) if retry_count < max_retries => {
                retry_count += 1;
                warn!(
                    attempt = retry_count,
                    max_retries,
                    error = %e,
                    "Failed to connect to database, retrying in {}s", wait_seconds
                );

                tokio::time::sleep(Duration::from_secs(wait_seconds)).await;

                wait_seconds *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Opens the contact store. The database is optional for this service: when
/// it cannot be reached at startup, a lazy pool is returned so inserts retry
/// on demand and fail (logged, non-fatal) until it comes back.
pub async fn connect_store(database_url: Option<&str>) -> Option<PgPool> {
    let Some(url) = database_url.filter(|url| !url.trim().is_empty()) else {
        warn!("No database configured; contact messages will not be persisted");
        return None;
    };

    match create_pool(url, 3).await {
        Ok(pool) => Some(pool),
        Err(e) => {
            warn!(error = %e, "Database unavailable at startup, falling back to a lazy pool");
            match pool_options().connect_lazy(url) {
                Ok(pool) => Some(pool),
                Err(e) => {
                    tracing::error!(error = %e, "Invalid database URL; persistence disabled");
                    None
                }
            }
        }
    }
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
