//! Connection pool and schema migrations
//!
//! The pool is built from a [`DatabaseConfig`], which the server fills from
//! its `API_DATABASE_*` settings.

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::error::DatabaseError;

/// Type alias for the PostgreSQL connection pool
pub type DatabasePool = PgPool;

/// Schema migrations, embedded at compile time
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Pool settings
///
/// ```rust
/// use infra_db::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("postgres://localhost/foodshare")
///     .max_connections(20)
///     .min_connections(2)
///     .acquire_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    pub url: String,
    /// Upper bound on open connections
    pub max_connections: u32,
    /// Connections kept open while idle
    pub min_connections: u32,
    /// How long a request waits for a free connection
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Settings for `url` with 10 connections, none kept warm, and a 30s
    /// acquire timeout
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 0,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Clamped to `max_connections` when the pool is built
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Opens a connection pool
///
/// # Errors
///
/// Returns `DatabaseError::ConnectionFailed` if the database is unreachable
///
/// ```rust,ignore
/// let pool = create_pool(DatabaseConfig::new("postgres://localhost/foodshare")).await?;
/// ```
pub async fn create_pool(config: DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        acquire_timeout_secs = config.acquire_timeout.as_secs(),
        "Creating database pool"
    );

    let pool = config
        .pool_options()
        .connect(&config.url)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Database pool created successfully");
    Ok(pool)
}

/// Applies any pending migrations
///
/// # Errors
///
/// Returns `DatabaseError::MigrationFailed` if a migration cannot be applied
/// or the applied history does not match the embedded set
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    info!(count = MIGRATOR.iter().count(), "Running database migrations");
    MIGRATOR.run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = DatabaseConfig::new("postgres://test")
            .max_connections(50)
            .min_connections(10)
            .acquire_timeout(Duration::from_secs(5));

        assert_eq!(config.max_connections, 50);
        assert_eq!(config.min_connections, 10);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_pool_options_follow_config() {
        let options = DatabaseConfig::new("postgres://test")
            .max_connections(4)
            .min_connections(9)
            .acquire_timeout(Duration::from_secs(3))
            .pool_options();

        assert_eq!(options.get_max_connections(), 4);
        assert_eq!(options.get_min_connections(), 4);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_migrations_are_embedded() {
        assert!(MIGRATOR.iter().count() >= 1);
    }
}
