//! Runtime logger configuration, built from `[logger]` settings

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::Level;

use super::error::LoggerError;

/// Validated outputs and level for [`super::init_logger`]
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub console: ConsoleConfig,
    pub file: FileConfig,
    /// One of trace, debug, info, warn, error; `RUST_LOG` overrides it
    pub level: String,
}

impl LoggerConfig {
    pub fn new(console: ConsoleConfig, file: FileConfig, level: String) -> Result<Self, LoggerError> {
        let config = Self { console, file, level };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LoggerError> {
        self.parse_level()?;
        self.file.validate()?;
        if !(self.console.enabled || self.file.enabled) {
            return Err(LoggerError::config("enable console or file output"));
        }
        Ok(())
    }

    pub fn parse_level(&self) -> Result<Level, LoggerError> {
        match self.level.to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            other => Err(LoggerError::config(format!(
                "unknown log level '{other}', expected trace, debug, info, warn or error"
            ))),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub enabled: bool,
    /// ANSI colours; ignored when stdout is not a terminal
    pub colored: bool,
}

impl ConsoleConfig {
    pub fn new(enabled: bool, colored: bool) -> Self {
        Self { enabled, colored }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::new(true, true)
    }
}

#[derive(Debug, Clone)]
pub struct FileConfig {
    pub enabled: bool,
    pub path: PathBuf,
    /// Truncate on startup when false
    pub append: bool,
    pub format: LogFormat,
}

impl FileConfig {
    pub fn new(enabled: bool, path: PathBuf, append: bool, format: LogFormat) -> Self {
        Self {
            enabled,
            path,
            append,
            format,
        }
    }

    /// Only checks the path is set; the directory is created on open.
    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.enabled && self.path.as_os_str().is_empty() {
            return Err(LoggerError::config("file output is enabled without a path"));
        }
        Ok(())
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new(false, PathBuf::from("logs/manage-api.log"), true, LogFormat::Json)
    }
}

/// Line format of the log file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Full => "full",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [LogFormat::Full, LogFormat::Compact, LogFormat::Json]
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                LoggerError::config(format!(
                    "unknown log format '{s}', expected full, compact or json"
                ))
            })
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
