//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! development defaults. The JWT secret is the exception: tokens signed
//! with a guessable secret are forgeable, so there is no fallback and
//! startup fails without one.

use std::env;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// SQLite database file path
    pub database_path: String,

    /// JWT signing secret (required, no default)
    pub jwt_secret: String,

    /// JWT token lifetime in seconds
    pub jwt_lifetime_secs: i64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            port: env::var("TEDDY_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TEDDY_PORT".to_string()))?,

            database_path: env::var("TEDDY_DB").unwrap_or_else(|_| "./teddy.db".to_string()),

            jwt_secret: match env::var("TEDDY_JWT_SECRET") {
                Ok(secret) if !secret.trim().is_empty() => secret,
                _ => {
                    return Err(ConfigError::MissingRequired(
                        "TEDDY_JWT_SECRET".to_string(),
                    ))
                }
            },

            jwt_lifetime_secs: env::var("TEDDY_JWT_LIFETIME_SECS")
                .unwrap_or_else(|_| "43200".to_string()) // 12 hours: a shop day
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TEDDY_JWT_LIFETIME_SECS".to_string()))?,
        };

        if config.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "TEDDY_JWT_LIFETIME_SECS".to_string(),
            ));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
