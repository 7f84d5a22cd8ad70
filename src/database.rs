use log::info;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;
use crate::store::{PgStore, Store, StoreError};

pub type Database = PgPool;

pub async fn create_database_pool(database_url: &str) -> Result<Database, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    // Test the connection
    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("Connected to database and applied migrations");
    Ok(pool)
}

/// Opens the store named by `DATABASE_URL`.
pub async fn open_store(config: &Config) -> Result<Store, StoreError> {
    if config.uses_memory_store() {
        info!("Using in-memory store; data is lost on exit");
        return Ok(Store::memory());
    }

    let pool = create_database_pool(&config.database_url).await?;
    Ok(Store::Postgres(PgStore::new(pool)))
}
