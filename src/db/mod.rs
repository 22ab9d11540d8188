mod models;

pub mod logs;
pub mod portal;
pub mod registry;
pub mod sessions;
pub mod settings;

pub use models::*;

use anyhow::Result;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

pub type DbPool = MySqlPool;

/// Errors surfaced by the storage layer. Everything the HTTP layer needs to
/// distinguish gets its own variant; the rest collapses into `Database`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a user with this email already exists")]
    DuplicateEmail,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Maps a failed insert to `DuplicateEmail` when the database rejected it on
/// the unique email index.
pub(crate) fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return StoreError::DuplicateEmail;
        }
    }
    StoreError::Database(err)
}

/// Execute a SQL migration file, properly handling comments
async fn execute_sql(pool: &MySqlPool, sql: &str) -> Result<()> {
    for statement in sql.split(';') {
        // Strip SQL comment lines (lines starting with --)
        let cleaned: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = cleaned.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

pub async fn init(config: &DatabaseConfig) -> Result<DbPool> {
    info!(
        host = %config.host,
        database = %config.database,
        "Connecting to database"
    );

    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url())
        .await?;

    run_migrations(&pool).await?;

    info!("Database initialized successfully");
    Ok(pool)
}

async fn run_migrations(pool: &MySqlPool) -> Result<()> {
    info!("Running database migrations...");
    execute_sql(pool, include_str!("../../migrations/001_initial.sql")).await?;
    info!("Migrations completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::ErrorKind;

    /// Stand-in for the driver's error type, so the unique-index translation
    /// can be exercised without a live server.
    #[derive(Debug)]
    struct FakeDbError {
        unique: bool,
    }

    impl std::fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            if self.unique {
                write!(f, "Duplicate entry 'jane@example.com' for key 'uq_users_email'")
            } else {
                write!(f, "Out of range value for column 'tenant_id'")
            }
        }
    }

    impl std::error::Error for FakeDbError {}

    impl sqlx::error::DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            if self.unique {
                "Duplicate entry 'jane@example.com' for key 'uq_users_email'"
            } else {
                "Out of range value for column 'tenant_id'"
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::Other
            }
        }
    }

    #[test]
    fn test_unique_violation_maps_to_duplicate_email() {
        let err = sqlx::Error::Database(Box::new(FakeDbError { unique: true }));
        assert!(matches!(
            map_insert_error(err),
            StoreError::DuplicateEmail
        ));
    }

    #[test]
    fn test_other_database_errors_pass_through() {
        let err = sqlx::Error::Database(Box::new(FakeDbError { unique: false }));
        assert!(matches!(
            map_insert_error(err),
            StoreError::Database(sqlx::Error::Database(_))
        ));
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        assert!(matches!(
            map_insert_error(sqlx::Error::PoolClosed),
            StoreError::Database(sqlx::Error::PoolClosed)
        ));
    }
}
