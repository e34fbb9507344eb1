//! Configuration merger for CLI arguments and config files
//!
//! Precedence, lowest to highest: configuration files, `MANAGE_*` environment
//! variables, global CLI flags, subcommand flags.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

/// Applies CLI overrides on top of file-based configuration
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    /// Create a new configuration merger with base configuration
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration the way the CLI asks for it
    ///
    /// `--config` selects a single file and `--env` the environment layer.
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;
        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }
        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path);
        }

        Ok(Self::new(loader.load()?))
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// # Returns
    /// A new, validated Settings instance with CLI overrides applied
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            dry_run: _,
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            // Subcommand level wins over --verbose/--quiet
            if let Some(level) = log_level {
                config.logger.level = (*level).into();
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Get the base configuration (useful for inspection)
    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn merger() -> ConfigurationMerger {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/test".to_string();
        ConfigurationMerger::new(config)
    }

    fn merge(args: &[&str]) -> Settings {
        let cli = Cli::try_parse_from(args).unwrap();
        merger().merge_cli_args(&cli).unwrap()
    }

    #[test]
    fn test_base_config_is_kept() {
        let base = Settings::default();
        let merger = ConfigurationMerger::new(base.clone());
        assert_eq!(merger.config(), &base);
    }

    #[test]
    fn test_global_flags() {
        assert_eq!(merge(&["manage-api", "--verbose"]).logger.level, "debug");
        assert_eq!(merge(&["manage-api", "--quiet"]).logger.level, "error");
    }

    #[test]
    fn test_serve_overrides() {
        let merged = merge(&["manage-api", "serve", "--host", "0.0.0.0", "--port", "8080"]);
        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 8080);
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let merged = merge(&["manage-api", "--verbose", "serve", "--log-level", "warn"]);
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_invalid_merged_config_is_rejected() {
        let cli = Cli::try_parse_from(["manage-api"]).unwrap();
        let result = ConfigurationMerger::new(Settings::default()).merge_cli_args(&cli);
        assert!(result.is_err(), "an empty database url must not validate");
    }
}
