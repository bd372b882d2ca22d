//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::Result;
use std::net::SocketAddr;

use crate::db::DatabaseBackend;

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `TODOS_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `TODOS_PORT`: The port to listen on (default: 5000)
/// - `TODOS_DB_BACKEND`: `postgres` or `memory` (default: "postgres")
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Which database backend to use.
    pub database_backend: DatabaseBackend,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `TODOS_PORT` is set but cannot be parsed as a valid port number
    /// - `TODOS_DB_BACKEND` names an unknown backend
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("TODOS_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("TODOS_PORT")
            .map(|p| p.parse::<u16>())
            .transpose()?
            .unwrap_or(5000);

        let database_backend = lookup("TODOS_DB_BACKEND")
            .map(|b| b.parse::<DatabaseBackend>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            database_backend,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port do not form a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_backend: DatabaseBackend::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_backend, DatabaseBackend::Postgres);
    }

    #[test]
    fn test_values_from_lookup() {
        let config = Config::from_lookup(lookup(&[
            ("TODOS_HOST", "127.0.0.1"),
            ("TODOS_PORT", "8081"),
            ("TODOS_DB_BACKEND", "memory"),
        ]))
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8081);
        assert_eq!(config.database_backend, DatabaseBackend::InMemory);
    }

    #[test]
    fn test_invalid_port_is_error() {
        assert!(Config::from_lookup(lookup(&[("TODOS_PORT", "not-a-port")])).is_err());
    }

    #[test]
    fn test_unknown_backend_is_error() {
        assert!(Config::from_lookup(lookup(&[("TODOS_DB_BACKEND", "oracle")])).is_err());
    }

    #[test]
    fn test_invalid_host_is_error() {
        let config = Config {
            host: "not a host".to_string(),
            ..Config::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
