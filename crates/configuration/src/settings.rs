use crate::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Connection settings for the relational store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Connection URL. When absent, `DATABASE_URL` from the environment is used.
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
    /// If set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml
// and still have it work with sensible defaults.

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            directory: None,
        }
    }
}

impl Config {
    /// Checks the values serde cannot: ranges and cross-field rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.database.acquire_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "database.acquire_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl ServerSettings {
    /// `host:port` as handed to the listener. The host may be an IP literal or
    /// a name such as `localhost`; names are resolved when binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseSettings {
    /// The configured URL, or `DATABASE_URL` from the environment.
    pub fn connection_url(&self) -> Result<String, ConfigError> {
        match &self.url {
            Some(url) if !url.trim().is_empty() => Ok(url.clone()),
            _ => env::var("DATABASE_URL")
                .map_err(|_e| ConfigError::ValidationError("DATABASE_URL must be set.".to_string())),
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.acquire_timeout(), Duration::from_secs(5));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn empty_host_is_rejected() {
        let mut config = Config::default();
        config.server.host = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn host_names_are_accepted() {
        let mut config = Config::default();
        config.server.host = "localhost".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_address(), "localhost:8000");
    }

    #[test]
    fn explicit_url_wins() {
        let settings = DatabaseSettings {
            url: Some("postgres://localhost/banks".to_string()),
            ..DatabaseSettings::default()
        };
        assert_eq!(settings.connection_url().unwrap(), "postgres://localhost/banks");
    }
}
