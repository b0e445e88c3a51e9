//! Server configuration.
//!
//! Loaded from environment variables with fallback to defaults, after
//! `.env` has been read.

use serde::{Deserialize, Serialize};
use std::env;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port.
    pub http_port: u16,

    /// Path to the SQLite database file.
    pub database_path: String,

    /// Maximum database connections in the pool.
    pub db_max_connections: u32,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "2022".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "klinika.db".to_string()),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Only touches variables this test controls
        env::remove_var("HTTP_PORT");
        env::remove_var("DATABASE_PATH");
        env::remove_var("DB_MAX_CONNECTIONS");

        let config = ServerConfig::load().unwrap();
        assert_eq!(config.http_port, 2022);
        assert_eq!(config.database_path, "klinika.db");
        assert_eq!(config.db_max_connections, 5);
    }
}
