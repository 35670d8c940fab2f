//! Persistence layer for Framework Hub.
//!
//! Build logs and generated code are stored as documents behind the
//! [`store::DocumentStore`] trait. Repositories in [`repositories`] map the
//! typed records in [`models`] onto that trait and are backend-agnostic.

pub mod models;
pub mod repositories;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

use store::memory::MemoryStore;
use store::postgres::PgDocumentStore;
use store::DocumentStore;

pub type DbPool = sqlx::PgPool;

/// Connect to PostgreSQL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify connectivity.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Connect to PostgreSQL and prepare the durable store.
pub async fn open_durable_store(database_url: &str) -> Result<PgDocumentStore, sqlx::Error> {
    let pool = create_pool(database_url).await?;
    health_check(&pool).await?;
    run_migrations(&pool).await?;
    Ok(PgDocumentStore::new(pool))
}

/// Select the storage backend for this process.
///
/// With a database URL, the durable store is used if it can be reached and
/// migrated. Without one, or on any failure, the process falls back to the
/// volatile in-memory store. The choice is final for the process lifetime.
pub async fn open_store(database_url: Option<&str>) -> Arc<dyn DocumentStore> {
    let Some(url) = database_url.filter(|url| !url.trim().is_empty()) else {
        tracing::warn!("DATABASE_URL not set, using in-memory storage (data is not persisted)");
        return Arc::new(MemoryStore::new());
    };

    match open_durable_store(url).await {
        Ok(store) => {
            tracing::info!("Connected to PostgreSQL document store");
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "PostgreSQL unavailable, falling back to in-memory storage (data is not persisted)"
            );
            Arc::new(MemoryStore::new())
        }
    }
}
