mod conversion;
mod feedback_repository;
mod store;

pub use feedback_repository::FeedbackRepository;
pub use store::{FeedbackStore, StoreError, StoreStatus};

use sqlx::{migrate::Migrator, sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[tracing::instrument(skip(url))]
pub async fn setup_database(url: &str) -> anyhow::Result<SqlitePool> {
    info!("Connecting to SQLite database at {url}");
    let pool = SqlitePoolOptions::new().connect(url).await?;
    info!("Running migrations");
    MIGRATOR.run(&pool).await?;
    info!("Done!");
    Ok(pool)
}

/// A migrated in-memory database. Limited to one connection because every
/// SQLite in-memory connection opens a separate database.
#[cfg(test)]
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    pool
}
