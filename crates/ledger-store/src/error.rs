use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfig(String),

    #[error("Failed to talk to the database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Portfolio {0} is not in the store")]
    UnknownPortfolio(Uuid),

    #[error("Corrupt ledger row: {0}")]
    Corrupt(#[from] core_types::CoreError),
}
