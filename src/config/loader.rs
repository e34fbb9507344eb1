//! Layered configuration loading
//!
//! Sources, lowest precedence first:
//! 1. `default.toml` (required)
//! 2. `{environment}.toml` (optional)
//! 3. `local.toml` (optional, not committed)
//! 4. `MANAGE_*` environment variables, `__` separating nested keys
//!
//! A single file given through `MANAGE_CONFIG_FILE` or `--config` replaces
//! steps 1 to 3.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

const CONFIG_DIR_ENV: &str = "MANAGE_CONFIG_DIR";
const CONFIG_FILE_ENV: &str = "MANAGE_CONFIG_FILE";
const DEFAULT_CONFIG_DIR: &str = "config";
const ENV_PREFIX: &str = "MANAGE";
const ENV_SEPARATOR: &str = "__";

/// Where the file-based part of the configuration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
enum FileSource {
    Layered(PathBuf),
    Single(PathBuf),
}

/// Builds `Settings` from files and environment variables
#[derive(Debug)]
pub struct ConfigLoader {
    files: FileSource,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Reads `MANAGE_CONFIG_DIR`, `MANAGE_CONFIG_FILE` and `MANAGE_APP_ENV`.
    ///
    /// # Errors
    ///
    /// Fails when both `MANAGE_CONFIG_DIR` and `MANAGE_CONFIG_FILE` are set.
    pub fn new() -> Result<Self, ConfigError> {
        let dir = std::env::var(CONFIG_DIR_ENV).ok();
        let file = std::env::var(CONFIG_FILE_ENV).ok();

        let files = match (dir, file) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::SourceConflict(format!(
                    "{CONFIG_DIR_ENV} selects a layered directory and {CONFIG_FILE_ENV} a \
                     single file; set only one of them"
                )));
            }
            (_, Some(file)) => FileSource::Single(PathBuf::from(file)),
            (dir, None) => FileSource::Layered(PathBuf::from(
                dir.as_deref().unwrap_or(DEFAULT_CONFIG_DIR),
            )),
        };

        Ok(Self {
            files,
            environment: AppEnvironment::from_env(),
        })
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Overrides the environment detected from `MANAGE_APP_ENV`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Loads only `path` instead of the layered directory
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files = FileSource::Single(path.into());
        self
    }

    /// Merges every source and validates the result.
    ///
    /// # Errors
    ///
    /// Missing `default.toml` (or the single file), unparsable sources and
    /// settings that fail validation.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let mut builder = Config::builder();
        builder = match &self.files {
            FileSource::Single(path) => with_toml(builder, path, true)?,
            FileSource::Layered(dir) => {
                let builder = with_toml(builder, &dir.join("default.toml"), true)?;
                let env_file = dir.join(format!("{}.toml", self.environment));
                let builder = with_toml(builder, &env_file, false)?;
                with_toml(builder, &dir.join("local.toml"), false)?
            }
        };

        let settings: Settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }
}

fn with_toml(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if required && !path.is_file() {
        return Err(ConfigError::MissingFile(path.display().to_string()));
    }
    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests touching MANAGE_* variables must not interleave
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const CONTROL_VARS: [&str; 3] = [CONFIG_DIR_ENV, CONFIG_FILE_ENV, AppEnvironment::ENV_VAR];

    const BASE: &str = r#"
[application]
name = "manage-api"

[database]
url = "postgres://localhost/manage"

[jwt]
secret = ""
"#;

    /// Sets variables for the lifetime of the guard and restores them on drop
    struct ScopedEnv(Vec<(String, Option<String>)>);

    impl ScopedEnv {
        fn clean() -> Self {
            let mut env = Self(Vec::new());
            for key in CONTROL_VARS {
                env.remove(key);
            }
            env
        }

        fn set(&mut self, key: &str, value: &str) {
            self.0.push((key.to_string(), std::env::var(key).ok()));
            unsafe { std::env::set_var(key, value) };
        }

        fn remove(&mut self, key: &str) {
            self.0.push((key.to_string(), std::env::var(key).ok()));
            unsafe { std::env::remove_var(key) };
        }
    }

    impl Drop for ScopedEnv {
        fn drop(&mut self) {
            for (key, value) in self.0.drain(..).rev() {
                unsafe {
                    match value {
                        Some(value) => std::env::set_var(&key, value),
                        None => std::env::remove_var(&key),
                    }
                }
            }
        }
    }

    fn config_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn layered(dir: &TempDir, environment: AppEnvironment) -> ConfigLoader {
        ConfigLoader {
            files: FileSource::Layered(dir.path().to_path_buf()),
            environment,
        }
    }

    #[test]
    fn test_new_defaults_to_config_directory() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = ScopedEnv::clean();

        let loader = ConfigLoader::new().unwrap();
        assert_eq!(loader.files, FileSource::Layered(PathBuf::from("config")));
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_new_reads_control_variables() {
        let _lock = ENV_LOCK.lock().unwrap();
        let mut env = ScopedEnv::clean();
        env.set(CONFIG_FILE_ENV, "/etc/manage-api/app.toml");
        env.set(AppEnvironment::ENV_VAR, "prod");

        let loader = ConfigLoader::new().unwrap();
        assert_eq!(
            loader.files,
            FileSource::Single(PathBuf::from("/etc/manage-api/app.toml"))
        );
        assert_eq!(loader.environment(), AppEnvironment::Production);
    }

    #[test]
    fn test_dir_and_file_are_mutually_exclusive() {
        let _lock = ENV_LOCK.lock().unwrap();
        let mut env = ScopedEnv::clean();
        env.set(CONFIG_DIR_ENV, "/etc/manage-api");
        env.set(CONFIG_FILE_ENV, "/etc/manage-api/app.toml");

        assert!(matches!(
            ConfigLoader::new(),
            Err(ConfigError::SourceConflict(_))
        ));
    }

    #[test]
    fn test_missing_default_toml() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = ScopedEnv::clean();
        let dir = config_dir(&[]);

        let err = layered(&dir, AppEnvironment::Development).load().unwrap_err();
        match err {
            ConfigError::MissingFile(path) => assert!(path.ends_with("default.toml")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_default_toml_fills_unset_sections() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = ScopedEnv::clean();
        let dir = config_dir(&[("default.toml", BASE)]);

        let settings = layered(&dir, AppEnvironment::Development).load().unwrap();
        assert_eq!(settings.database.url, "postgres://localhost/manage");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.application.route_prefix(), "/api/manage");
        assert!(settings.products.zero_customer_type_is_unspecified);
        assert!(settings.database.pools.is_empty());
    }

    #[test]
    fn test_layers_apply_in_order() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = ScopedEnv::clean();
        let dir = config_dir(&[
            ("default.toml", BASE),
            (
                "production.toml",
                "[server]\nport = 8080\nhost = \"0.0.0.0\"\n[application]\napi_version = \"v2\"\n",
            ),
            ("local.toml", "[server]\nport = 9090\n"),
            ("test.toml", "[server]\nport = 1111\n"),
        ]);

        let settings = layered(&dir, AppEnvironment::Production).load().unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.application.route_prefix(), "/api/v2/manage");
    }

    #[test]
    fn test_environment_variables_win() {
        let _lock = ENV_LOCK.lock().unwrap();
        let mut env = ScopedEnv::clean();
        env.set("MANAGE_SERVER__PORT", "7070");
        env.set("MANAGE_JWT__SECRET", "0123456789abcdef0123456789abcdef");
        env.set("MANAGE_PRODUCTS__ZERO_CUSTOMER_TYPE_IS_UNSPECIFIED", "false");
        let dir = config_dir(&[("default.toml", BASE), ("local.toml", "[server]\nport = 9090\n")]);

        let settings = layered(&dir, AppEnvironment::Development).load().unwrap();
        assert_eq!(settings.server.port, 7070);
        assert_eq!(settings.jwt.secret, "0123456789abcdef0123456789abcdef");
        assert!(!settings.products.zero_customer_type_is_unspecified);
    }

    #[test]
    fn test_single_file_skips_layers() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = ScopedEnv::clean();
        let single = format!(
            "{BASE}\n[database.pools.reporting]\nurl = \"postgres://replica/manage\"\n"
        );
        let dir = config_dir(&[
            ("default.toml", "[server]\nport = 1\n"),
            ("single.toml", single.as_str()),
        ]);

        let loader = ConfigLoader {
            files: FileSource::Layered(dir.path().to_path_buf()),
            environment: AppEnvironment::Development,
        }
        .with_config_file(dir.path().join("single.toml"));

        let settings = loader.load().unwrap();
        assert_eq!(settings.server.port, 3000);
        let reporting = &settings.database.pools["reporting"];
        assert_eq!(reporting.url, "postgres://replica/manage");
        assert_eq!(reporting.max_connections, 10);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = ScopedEnv::clean();
        let dir = config_dir(&[("default.toml", "[database]\nurl = \"mysql://localhost/x\"\n")]);

        let err = layered(&dir, AppEnvironment::Development).load().unwrap_err();
        assert_eq!(err.field(), "database.url");
    }

    #[test]
    fn test_with_environment_selects_layer() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = ScopedEnv::clean();
        let dir = config_dir(&[("default.toml", BASE), ("test.toml", "[server]\nport = 4000\n")]);

        let settings = layered(&dir, AppEnvironment::Development)
            .with_environment(AppEnvironment::Test)
            .load()
            .unwrap();
        assert_eq!(settings.server.port, 4000);
    }
}
