//! Environment-driven configuration.
//!
//! All configuration comes from the environment (plus a `.env` file
//! loaded by `main`). The config is collected once, up front, into an
//! explicit value that gets passed around; nothing reads variables at
//! use sites.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

/// Default HTTP port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 3000;

/// Process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// CSV to import when a request carries no file.
    pub csv_path: Option<PathBuf>,
    /// HTTP listen port.
    pub port: u16,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// `DATABASE_URL` is required; `CSV_FILE_PATH` and `PORT` are
    /// optional.
    pub fn from_env() -> ConfigResult<Self> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let csv_path = env::var("CSV_FILE_PATH").ok().map(PathBuf::from);

        let port = parse_port(env::var("PORT").ok())?;

        Ok(Self {
            database_url,
            csv_path,
            port,
        })
    }

    /// The configured CSV path, or the error an import without a file
    /// should surface.
    pub fn require_csv_path(&self) -> ConfigResult<&Path> {
        self.csv_path
            .as_deref()
            .ok_or(ConfigError::MissingCsvPath)
    }
}

fn parse_port(value: Option<String>) -> ConfigResult<u16> {
    match value {
        None => Ok(DEFAULT_PORT),
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            name: "PORT".to_string(),
            message: format!("'{}' is not a valid port number", raw),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_defaults_when_unset() {
        assert_eq!(parse_port(None).unwrap(), DEFAULT_PORT);
    }

    #[test]
    fn test_port_parses() {
        assert_eq!(parse_port(Some("8080".into())).unwrap(), 8080);
    }

    #[test]
    fn test_port_rejects_garbage() {
        let err = parse_port(Some("not-a-port".into())).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_require_csv_path() {
        let config = AppConfig {
            database_url: "postgres://localhost/test".into(),
            csv_path: None,
            port: DEFAULT_PORT,
        };
        assert!(config.require_csv_path().is_err());

        let config = AppConfig {
            csv_path: Some(PathBuf::from("/data/users.csv")),
            ..config
        };
        assert!(config.require_csv_path().is_ok());
    }
}
