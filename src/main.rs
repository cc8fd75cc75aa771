use std::sync::Arc;

use color_eyre::eyre::{Result, eyre};
use dotenv::dotenv;
use slotbook_api::config::{ApiConfig, StorageBackend};
use slotbook_core::repository::Store;
use slotbook_db::{MemoryStore, PgStore, create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    let store: Arc<dyn Store> = match config.storage {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| eyre!("DATABASE_URL must be set for the postgres backend"))?;

            // Create database connection pool
            let db_pool = create_pool(database_url).await?;

            // Initialize database schema
            initialize_database(&db_pool).await?;

            Arc::new(PgStore::new(db_pool))
        }
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };

    // Start API server
    slotbook_api::start_server(config, store).await?;

    Ok(())
}
