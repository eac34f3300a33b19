//! API configuration

use std::time::Duration;

use serde::Deserialize;

use infra_db::DatabaseConfig;

/// API configuration
///
/// Every field can be set through an `API_`-prefixed environment variable,
/// e.g. `API_JWT_SECRET` or `API_DATABASE_MAX_CONNECTIONS`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// Database URL
    pub database_url: String,
    /// Upper bound on pooled database connections
    pub database_max_connections: u32,
    /// Connections kept open while idle
    pub database_min_connections: u32,
    /// Seconds a request waits for a pooled connection
    pub database_acquire_timeout_secs: u64,
    /// How often overdue listings are expired; 0 disables the sweep
    pub expiry_sweep_interval_secs: u64,
    /// Log level
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            database_url: "postgres://localhost/foodshare".to_string(),
            database_max_connections: 10,
            database_min_connections: 0,
            database_acquire_timeout_secs: 30,
            expiry_sweep_interval_secs: 60,
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from the environment, falling back to defaults
    /// for anything unset
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port)?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("database_url", defaults.database_url)?
            .set_default("database_max_connections", defaults.database_max_connections)?
            .set_default("database_min_connections", defaults.database_min_connections)?
            .set_default("database_acquire_timeout_secs", defaults.database_acquire_timeout_secs)?
            .set_default("expiry_sweep_interval_secs", defaults.expiry_sweep_interval_secs)?
            .set_default("log_level", defaults.log_level)?
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool settings for the configured database
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.database_url)
            .max_connections(self.database_max_connections)
            .min_connections(self.database_min_connections)
            .acquire_timeout(Duration::from_secs(self.database_acquire_timeout_secs))
    }
}
