//! CLI subcommands.

pub mod indexes;
pub mod orders;
pub mod users;

use bazaar_api::config::{ApiConfig, ConfigError};
use bazaar_api::db::{MongoStore, RepositoryError};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Store operation failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load configuration and connect to MongoDB.
async fn connect() -> Result<MongoStore, CommandError> {
    let config = ApiConfig::from_env()?;

    tracing::info!("Connecting to MongoDB...");
    let store = MongoStore::connect(
        &config.mongo_uri,
        config.mongo_database.as_deref(),
        config.store_timeout,
    )
    .await?;
    tracing::info!(database = store.database_name(), "Connected");

    Ok(store)
}

/// Print records to stdout as a pretty JSON array.
fn print_json<T: Serialize>(records: &[T]) -> Result<(), CommandError> {
    let output = serde_json::to_string_pretty(records)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}
