//! Configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use pancake_core::PostServiceConfig;

use crate::database::DatabaseConfig;
use crate::telemetry::TelemetryConfig;

/// Blog configuration.
#[derive(Debug, Clone)]
pub struct BlogConfig {
    pub database: Option<DatabaseConfig>,
    pub posts: PostServiceConfig,
    pub telemetry: TelemetryConfig,
}

impl BlogConfig {
    /// Load a `.env` file if present, then read the environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    ///
    /// Unparseable numbers fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str, default| parse_or(lookup(key), default);

        let database = lookup("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 100),
            min_connections: parsed("DB_MIN_CONNECTIONS", 10),
        });

        Self {
            database,
            posts: PostServiceConfig {
                slug_insert_attempts: parsed("SLUG_INSERT_ATTEMPTS", 3),
            },
            telemetry: TelemetryConfig::from_lookup(&lookup),
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
