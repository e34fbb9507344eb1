//! Errors raised while loading or validating configuration

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration file is missing
    #[error("Configuration file not found: {0}")]
    MissingFile(String),

    /// The merged sources did not deserialize into `Settings`
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// A value is present but unusable
    #[error("Invalid {field}: {message}")]
    Invalid { field: String, message: String },

    /// A `MANAGE_*` control variable has an unusable value
    #[error("Environment variable error: {0}")]
    Env(String),

    /// Two configuration sources were selected at once
    #[error("Conflicting configuration sources: {0}")]
    SourceConflict(String),

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Configuration key the error refers to, or a category for errors without one.
    pub fn field(&self) -> &str {
        match self {
            ConfigError::Invalid { field, .. } => field,
            ConfigError::MissingFile(_) => "config_file",
            ConfigError::Parse(_) | ConfigError::Source(_) => "config",
            ConfigError::Env(_) | ConfigError::SourceConflict(_) => "environment",
        }
    }
}
