//! CLI command implementations.

pub mod migrate;
pub mod subscriptions;
pub mod users;

use glassspire_server::config::{ConfigError, ServerConfig};
use glassspire_server::db::{RepositoryError, create_pool};
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by the database-backed commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("No user with id {0}")]
    UserNotFound(i32),
}

/// Load server configuration and connect.
pub async fn connect() -> Result<PgPool, CommandError> {
    let config = ServerConfig::from_env()?;
    tracing::info!("Connecting to database...");
    Ok(create_pool(&config.database_url).await?)
}
