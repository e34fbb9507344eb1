//! Deployment environment selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

/// Which `{environment}.toml` layer the loader picks up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    /// Variable consulted when the CLI does not pass `--env`
    pub const ENV_VAR: &'static str = "MANAGE_APP_ENV";

    /// Environment named by `MANAGE_APP_ENV`, falling back to development
    /// when the variable is unset or unrecognised.
    pub fn from_env() -> Self {
        match std::env::var(Self::ENV_VAR) {
            Ok(value) => value.parse().unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::Env(format!(
                "{} must be one of development, test, production; got '{other}'",
                Self::ENV_VAR
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_aliases() {
        let cases = [
            ("development", Environment::Development),
            ("dev", Environment::Development),
            (" Test ", Environment::Test),
            ("PROD", Environment::Production),
            ("production", Environment::Production),
        ];
        for (input, expected) in cases {
            assert_eq!(input.parse::<Environment>().unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        let err = "staging".parse::<Environment>().unwrap_err();
        assert!(err.to_string().contains("MANAGE_APP_ENV"));
    }

    #[test]
    fn test_display_matches_layer_file_stem() {
        assert_eq!(Environment::Production.to_string(), "production");
        assert_eq!(Environment::default().as_str(), "development");
    }
}
