//! Typed view of the merged configuration
//!
//! Every section falls back to its `Default` impl, so a `default.toml` only
//! needs the keys it wants to change. `database.url` has no usable default
//! and is rejected by validation when left empty.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

/// Minimum HS256 secret length accepted at startup
const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub application: ApplicationConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub logger: LoggerSettings,
    pub products: ProductsConfig,
}

/// Service identity; also decides the route prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub name: String,
    pub version: String,
    /// Last segment of the route prefix
    pub service_name: String,
    /// Optional segment between `/api` and the service name
    pub api_version: Option<String>,
}

impl ApplicationConfig {
    /// Mount point of the products and users routes.
    ///
    /// `/api/{service}` without an API version, `/api/{version}/{service}` with one.
    pub fn route_prefix(&self) -> String {
        match self.api_version.as_deref().filter(|v| !v.is_empty()) {
            Some(version) => format!("/api/{}/{}", version, self.service_name),
            None => format!("/api/{}", self.service_name),
        }
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: "manage-api".to_string(),
            version: crate::pkg_version().to_string(),
            service_name: "manage".to_string(),
            api_version: None,
        }
    }
}

/// Listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests still running after this many seconds are answered with 408
    pub request_timeout: u64,
}

impl ServerConfig {
    /// `host:port`, bracketing IPv6 hosts
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout: 30,
        }
    }
}

/// Default pool plus any number of named pools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds to wait for a connection before giving up
    pub connection_timeout: u64,
    pub pools: BTreeMap<String, NamedPoolConfig>,
    /// Named pool the stored procedures run on; the default pool when unset
    pub procedure_pool: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connection_timeout: 30,
            pools: BTreeMap::new(),
            procedure_pool: None,
        }
    }
}

/// `[database.pools.<name>]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPoolConfig {
    pub url: String,
    #[serde(default = "NamedPoolConfig::default_max_connections")]
    pub max_connections: u32,
}

impl NamedPoolConfig {
    fn default_max_connections() -> u32 {
        DatabaseConfig::default().max_connections
    }
}

/// Bearer token verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JwtConfig {
    /// Shared HS256 secret; supply it through `MANAGE_JWT__SECRET`
    pub secret: String,
}

impl JwtConfig {
    /// Checked at startup and by `serve --dry-run` only, so other tooling
    /// can load settings without a secret.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::invalid("jwt.secret", "JWT secret cannot be empty"));
        }
        if self.secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::invalid(
                "jwt.secret",
                format!("JWT secret must be at least {MIN_JWT_SECRET_LEN} characters"),
            ));
        }
        Ok(())
    }
}

/// Products spotlight switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductsConfig {
    /// A customer type of `0` in PUT/DELETE paths behaves like `null` and
    /// leaves the procedure's customer type parameter out.
    pub zero_customer_type_is_unspecified: bool,
}

impl Default for ProductsConfig {
    fn default() -> Self {
        Self {
            zero_customer_type_is_unspecified: true,
        }
    }
}

/// `[logger]`; converted into a [`LoggerConfig`] at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    pub level: String,
    pub console: ConsoleSettings,
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    pub enabled: bool,
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub enabled: bool,
    pub path: String,
    pub append: bool,
    /// `full`, `compact` or `json`
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "logs/manage-api.log".to_string(),
            append: true,
            format: LogFormat::Json.as_str().to_string(),
        }
    }
}

impl LoggerSettings {
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file = self.file.into_file_config()?;
        LoggerConfig::new(console, file, self.level)
            .map_err(|e| ConfigError::invalid("logger", e.to_string()))
    }
}

impl FileSettings {
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format: LogFormat = self
            .format
            .parse()
            .map_err(|e: crate::logger::LoggerError| {
                ConfigError::invalid("logger.file.format", e.to_string())
            })?;
        Ok(FileConfig::new(
            self.enabled,
            PathBuf::from(self.path),
            self.append,
            format,
        ))
    }
}
