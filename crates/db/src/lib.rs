//! PostgreSQL persistence for learning paths, modules, lessons and learner
//! records.
//!
//! - [`models`] -- row structs and create/update DTOs.
//! - [`repositories`] -- zero-sized repos with async methods over `&PgPool`.

use sqlx::postgres::PgPoolOptions;
use trailhead_core::error::CoreError;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Default pool size when the caller does not configure one.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Error from repository operations that validate input against stored
/// state (reorder) as well as touching the database.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    /// Connection-level failures become [`CoreError::Unavailable`]; every
    /// other database error is kept as-is.
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                RepoError::Core(CoreError::Unavailable(err.to_string()))
            }
            other => RepoError::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn connection_failures_map_to_unavailable() {
        assert_matches!(
            RepoError::from(sqlx::Error::PoolTimedOut),
            RepoError::Core(CoreError::Unavailable(_))
        );
        assert_matches!(
            RepoError::from(sqlx::Error::PoolClosed),
            RepoError::Core(CoreError::Unavailable(_))
        );
    }

    #[test]
    fn other_database_errors_are_kept() {
        assert_matches!(
            RepoError::from(sqlx::Error::RowNotFound),
            RepoError::Database(sqlx::Error::RowNotFound)
        );
    }
}
