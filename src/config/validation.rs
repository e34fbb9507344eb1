//! Checks run on the merged settings, once after loading and again after
//! CLI overrides are applied.

use crate::config::error::ConfigError;
use crate::config::settings::{
    ApplicationConfig, DatabaseConfig, LoggerSettings, ServerConfig, Settings,
};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// diesel-async speaks PostgreSQL only
const DATABASE_SCHEMES: [&str; 2] = ["postgres://", "postgresql://"];

fn ensure(ok: bool, field: impl Into<String>, message: impl Into<String>) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, message))
    }
}

fn is_postgres_url(url: &str) -> bool {
    DATABASE_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
}

/// Route prefix segments must not split or contain whitespace
fn is_path_segment(value: &str) -> bool {
    !value.is_empty() && !value.contains('/') && !value.chars().any(char::is_whitespace)
}

impl ApplicationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            is_path_segment(&self.service_name),
            "application.service_name",
            format!("'{}' is not a single path segment", self.service_name),
        )?;
        match self.api_version.as_deref() {
            Some(version) if !version.is_empty() => ensure(
                is_path_segment(version),
                "application.api_version",
                format!("'{version}' is not a single path segment"),
            ),
            _ => Ok(()),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.port != 0, "server.port", "port 0 cannot be bound explicitly")?;
        ensure(
            self.request_timeout > 0,
            "server.request_timeout",
            "must be at least one second",
        )
    }
}

impl DatabaseConfig {
    /// The default pool and every named pool need a PostgreSQL URL and a
    /// non-zero size; `min_connections` may not exceed `max_connections`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(!self.url.is_empty(), "database.url", "a connection URL is required")?;
        ensure(
            is_postgres_url(&self.url),
            "database.url",
            "expected postgres://[user:password@]host[:port]/database",
        )?;
        ensure(
            self.max_connections > 0,
            "database.max_connections",
            "must be greater than 0",
        )?;
        ensure(
            self.min_connections > 0,
            "database.min_connections",
            "must be greater than 0",
        )?;
        ensure(
            self.min_connections <= self.max_connections,
            "database.min_connections",
            format!(
                "{} exceeds max_connections ({})",
                self.min_connections, self.max_connections
            ),
        )?;
        ensure(
            self.connection_timeout > 0,
            "database.connection_timeout",
            "must be at least one second",
        )?;

        if let Some(name) = &self.procedure_pool {
            ensure(
                self.pools.contains_key(name),
                "database.procedure_pool",
                format!("no [database.pools.{name}] section is configured"),
            )?;
        }

        for (name, pool) in &self.pools {
            ensure(
                is_postgres_url(&pool.url),
                format!("database.pools.{name}.url"),
                "named pools need a postgres:// URL",
            )?;
            ensure(
                pool.max_connections > 0,
                format!("database.pools.{name}.max_connections"),
                "must be greater than 0",
            )?;
        }
        Ok(())
    }
}

impl LoggerSettings {
    /// Level and outputs are checked here; the file format is checked by
    /// the conversion into the logger's own configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            LOG_LEVELS.contains(&self.level.to_ascii_lowercase().as_str()),
            "logger.level",
            format!("'{}' is not one of {}", self.level, LOG_LEVELS.join(", ")),
        )?;
        ensure(
            self.console.enabled || self.file.enabled,
            "logger",
            "enable console or file output",
        )?;
        ensure(
            !(self.file.enabled && self.file.path.trim().is_empty()),
            "logger.file.path",
            "required when file output is enabled",
        )?;
        self.file.clone().into_file_config().map(drop)
    }
}

impl Settings {
    /// First failing section wins. The JWT secret is checked separately at
    /// server startup so that tooling commands can run without it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.application.validate()?;
        self.server.validate()?;
        self.database.validate()?;
        self.logger.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::NamedPoolConfig;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.url = "postgres://localhost/manage".to_string();
        settings
    }

    #[test]
    fn test_settings_valid() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn test_server_config_invalid_port_zero() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "server.port")
        );
    }

    #[test]
    fn test_server_config_invalid_request_timeout() {
        let config = ServerConfig {
            request_timeout: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "server.request_timeout")
        );
    }

    #[test]
    fn test_database_config_empty_url() {
        let err = DatabaseConfig::default().validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "database.url")
        );
    }

    #[test]
    fn test_database_config_rejects_non_postgres_url() {
        let config = DatabaseConfig {
            url: "mysql://localhost/db".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_database_config_min_exceeds_max() {
        let config = DatabaseConfig {
            url: "postgres://localhost/db".to_string(),
            max_connections: 2,
            min_connections: 5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "database.min_connections")
        );
    }

    #[test]
    fn test_database_config_named_pool_needs_url() {
        let mut config = DatabaseConfig {
            url: "postgres://localhost/db".to_string(),
            ..Default::default()
        };
        config.pools.insert(
            "reporting".to_string(),
            NamedPoolConfig {
                url: String::new(),
                max_connections: 2,
            },
        );
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "database.pools.reporting.url")
        );
    }

    #[test]
    fn test_procedure_pool_must_be_configured() {
        let mut config = DatabaseConfig {
            url: "postgres://localhost/db".to_string(),
            procedure_pool: Some("reporting".to_string()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field(), "database.procedure_pool");

        config.pools.insert(
            "reporting".to_string(),
            NamedPoolConfig {
                url: "postgres://replica/db".to_string(),
                max_connections: 2,
            },
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_application_config_rejects_slash_in_service_name() {
        let config = ApplicationConfig {
            service_name: "manage/extra".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_application_config_accepts_version() {
        let config = ApplicationConfig {
            api_version: Some("v1".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logger_settings_invalid_level() {
        let settings = LoggerSettings {
            level: "verbose".to_string(),
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "logger.level")
        );
    }

    #[test]
    fn test_logger_settings_rejects_unknown_format() {
        let mut settings = LoggerSettings::default();
        settings.file.format = "yaml".to_string();
        let err = settings.validate().unwrap_err();
        assert_eq!(err.field(), "logger.file.format");
    }

    #[test]
    fn test_logger_settings_requires_an_output() {
        let mut settings = LoggerSettings::default();
        settings.console.enabled = false;
        settings.file.enabled = false;
        assert!(settings.validate().is_err());
    }
}
