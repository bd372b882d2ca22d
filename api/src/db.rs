//! Database connection module.
//!
//! Loads PostgreSQL connection settings from environment variables and opens
//! the configured [`Database`] backend.

use anyhow::{bail, Result};
use shared::db::{Database, InMemoryDatabase, PostgresDatabase};
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;
use std::sync::Arc;

/// Database backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseBackend {
    /// PostgreSQL via sqlx.
    #[default]
    Postgres,
    /// Process-local todo table, for development and tests.
    InMemory,
}

impl FromStr for DatabaseBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::InMemory),
            other => bail!("Unknown database backend: {other}"),
        }
    }
}

/// Database configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Username for authentication.
    pub user: String,
    /// Password for authentication.
    pub password: String,
    /// Database name to use.
    pub database: String,
}

impl DatabaseConfig {
    /// Load database configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DB_HOST`: Database host (default: "db")
    /// - `DB_PORT`: Database port (default: 5432)
    /// - `DB_USER`: Database user (default: "admin")
    /// - `DB_PASSWORD`: Database password (default: "admin")
    /// - `DB_NAME`: Database name (default: "todos")
    ///
    /// # Errors
    ///
    /// Returns an error if `DB_PORT` is set but is not a valid port number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load database configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`DatabaseConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("DB_PORT")
            .map(|p| p.parse::<u16>())
            .transpose()?
            .unwrap_or(5432);

        Ok(Self {
            host: lookup("DB_HOST").unwrap_or_else(|| "db".to_string()),
            port,
            user: lookup("DB_USER").unwrap_or_else(|| "admin".to_string()),
            password: lookup("DB_PASSWORD").unwrap_or_else(|| "admin".to_string()),
            database: lookup("DB_NAME").unwrap_or_else(|| "todos".to_string()),
        })
    }

    /// Builds sqlx connection options from this configuration.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "db".to_string(),
            port: 5432,
            user: "admin".to_string(),
            password: "admin".to_string(),
            database: "todos".to_string(),
        }
    }
}

/// Opens the selected backend.
///
/// The PostgreSQL pool connects lazily, so the server starts even if the
/// database is not reachable yet; failures surface per query instead.
/// Must be called from within a Tokio runtime.
#[must_use]
pub fn open_database(backend: DatabaseBackend, config: &DatabaseConfig) -> Arc<dyn Database> {
    match backend {
        DatabaseBackend::Postgres => {
            tracing::info!(
                host = %config.host,
                port = config.port,
                database = %config.database,
                "Using PostgreSQL database"
            );
            Arc::new(PostgresDatabase::connect_lazy(config.connect_options()))
        }
        DatabaseBackend::InMemory => {
            tracing::warn!("Using in-memory database; data will not survive a restart");
            Arc::new(InMemoryDatabase::new())
        }
    }
}
