//! Tests for the logger module

use crate::logger::config::*;
use crate::logger::open_log_file;
use std::path::PathBuf;

#[cfg(test)]
mod config_tests {
    use super::*;

    fn create_test_config() -> LoggerConfig {
        LoggerConfig {
            console: ConsoleConfig {
                enabled: true,
                colored: false,
            },
            file: FileConfig {
                enabled: false,
                path: PathBuf::from("test.log"),
                append: true,
                format: LogFormat::Full,
            },
            level: "info".to_string(),
        }
    }

    #[test]
    fn test_default_config_creation() {
        let config = LoggerConfig::default();
        assert!(config.console.enabled);
        assert!(config.console.colored);
        assert!(!config.file.enabled);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let mut config = create_test_config();
        assert!(config.validate().is_ok());

        config.console.enabled = false;
        config.file.enabled = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_level_rejected() {
        let mut config = create_test_config();
        config.level = "chatty".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_enabled_file_requires_path() {
        let mut config = create_test_config();
        config.file.enabled = true;
        config.file.path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::Full.as_str(), "full");
        assert!("yaml".parse::<LogFormat>().is_err());
    }
}

#[cfg(test)]
mod file_tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_file_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let config = FileConfig::new(
            true,
            dir.path().join("nested/logs/app.log"),
            true,
            LogFormat::Json,
        );

        let mut file = open_log_file(&config).unwrap();
        writeln!(file, "line").unwrap();
        assert!(config.path.exists());
    }

    #[test]
    fn test_open_log_file_truncates_without_append() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "old contents\n").unwrap();

        let config = FileConfig::new(true, path.clone(), false, LogFormat::Full);
        drop(open_log_file(&config).unwrap());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_open_log_file_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "kept\n").unwrap();

        let config = FileConfig::new(true, path.clone(), true, LogFormat::Full);
        let mut file = open_log_file(&config).unwrap();
        writeln!(file, "added").unwrap();
        drop(file);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "kept\nadded\n");
    }
}
