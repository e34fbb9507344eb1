//! Command line surface of the `manage-api` binary

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use super::validation::{validate_config_file_path, validate_host_address, validate_port};

/// Products spotlight and user management API
#[derive(Debug, Parser)]
#[command(name = "manage-api", version = crate::build::CLAP_LONG_VERSION)]
#[command(about = "Products spotlight and user management API")]
#[command(long_about = "
Serves the products spotlight and user endpoints. Each request runs one
stored procedure in the `manage` schema of the configured PostgreSQL
database.

Configuration comes from config/default.toml, config/{env}.toml,
config/local.toml and MANAGE_* variables, in that order.

EXAMPLES:
    manage-api                                  # same as `serve`
    manage-api serve --host 0.0.0.0 --port 8080
    manage-api --config /etc/manage-api.toml serve
    manage-api --env production serve --dry-run
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Load this TOML file instead of the layered config/ directory
    ///
    /// MANAGE_* environment variables still apply on top of it.
    #[arg(short, long, value_name = "FILE", value_parser = validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Environment layer to load; overrides MANAGE_APP_ENV
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Bind address, IP or hostname [config: server.host]
        #[arg(long, value_name = "ADDRESS", value_parser = validate_host_address)]
        host: Option<String>,

        /// Listen port [config: server.port]
        #[arg(short, long, value_name = "PORT", value_parser = validate_port)]
        port: Option<u16>,

        /// Log level; wins over --verbose and --quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Check configuration and the JWT secret, print a summary and exit
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Environment {
    #[value(alias = "dev")]
    Development,
    #[value(alias = "prod")]
    Production,
    Test,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    /// Whether this invocation only validates configuration
    pub fn is_dry_run(&self) -> bool {
        matches!(self.command, Some(Commands::Serve { dry_run: true, .. }))
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_string()
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        use crate::config::Environment as Config;
        match env {
            Environment::Development => Config::Development,
            Environment::Production => Config::Production,
            Environment::Test => Config::Test,
        }
    }
}
