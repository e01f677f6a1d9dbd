use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{Config, DatabaseSettings, LogFormat, LoggingSettings, ServerSettings};

/// Prefix of the environment variables that override file settings,
/// e.g. `BANK_REGISTRY__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "BANK_REGISTRY";

/// Loads the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, an optional
/// `config.toml` in the working directory, then `BANK_REGISTRY__*`
/// environment variables. A `.env` file is loaded first if present.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    let builder = config::Config::builder()
        // Tells the builder to look for `config.toml`, but not to insist on it.
        .add_source(config::File::with_name("config").required(false));
    finish(builder)
}

/// Same as [`load_config`] but reads the TOML from a string instead of a file.
pub fn load_config_from_str(toml: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml));
    finish(builder)
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Config, ConfigError> {
    let built = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = built.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = load_config_from_str(
            r#"
            [server]
            port = 9100

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn invalid_values_fail_validation() {
        let err = load_config_from_str("[database]\nmax_connections = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn malformed_file_is_a_load_error() {
        let err = load_config_from_str("[server\nport = 1").unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
