//! Layered runtime configuration.
//!
//! Sources are merged in order, later ones overriding earlier ones:
//! `config/default.*`, then `config/{RUN_MODE}.*`, then environment
//! variables prefixed with `PASSBOOK` and separated with `__`
//! (`PASSBOOK__SERVER__PORT=9000`). Only `database.url` and `jwt.secret`
//! have no default and must be supplied.

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Token signing settings.
    pub jwt: JwtSettings,
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source fails to parse or a required value
    /// is missing.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PASSBOOK").separator("__"))
            .build()?
            .try_deserialize()
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "DatabaseConfig::default_min_connections")]
    pub min_connections: u32,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        10
    }

    fn default_min_connections() -> u32 {
        1
    }
}

/// Token signing settings as loaded from files/environment.
///
/// Expiries are in seconds and are passed through to the JWT service
/// unconverted.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds (default 15 minutes).
    #[serde(default = "JwtSettings::default_access_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds (default 1 day).
    #[serde(default = "JwtSettings::default_refresh_expiry")]
    pub refresh_token_expiry_secs: u64,
}

impl JwtSettings {
    fn default_access_expiry() -> u64 {
        900
    }

    fn default_refresh_expiry() -> u64 {
        86400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(raw: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_minimal_config_fills_defaults() {
        let cfg = from_toml(
            r#"
            [database]
            url = "postgres://localhost/passbook"

            [jwt]
            secret = "s3cret"
            "#,
        );

        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.database.min_connections, 1);
        assert_eq!(cfg.jwt.access_token_expiry_secs, 900);
        assert_eq!(cfg.jwt.refresh_token_expiry_secs, 86400);
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let cfg = from_toml(
            r#"
            [server]
            port = 3000

            [database]
            url = "postgres://localhost/passbook"
            max_connections = 32

            [jwt]
            secret = "s3cret"
            refresh_token_expiry_secs = 43200
            "#,
        );

        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.database.max_connections, 32);
        // Sub-day values are legal and kept as-is.
        assert_eq!(cfg.jwt.refresh_token_expiry_secs, 43200);
    }

    #[test]
    fn test_missing_database_url_is_an_error() {
        let result: Result<AppConfig, _> = config::Config::builder()
            .add_source(config::File::from_str(
                "[jwt]\nsecret = \"s3cret\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize();

        assert!(result.is_err());
    }
}
