//! Process-wide `tracing` setup
//!
//! One registry carries an `EnvFilter`, an optional console layer and an
//! optional file layer whose line format is chosen at runtime.

pub mod config;
pub mod error;

#[cfg(test)]
mod tests;

pub use config::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};
pub use error::LoggerError;

use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::sync::Mutex;

use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Installs the global subscriber.
///
/// # Errors
/// Invalid configuration, an unopenable log file, or a subscriber that is
/// already installed.
pub fn init_logger(config: LoggerConfig) -> Result<(), LoggerError> {
    config.validate()?;

    // The file layer sits below the console layer so ANSI span formatting
    // from the console never reaches the file (tokio-rs/tracing#1817).
    let file_layer = config
        .file
        .enabled
        .then(|| file_layer(&config.file))
        .transpose()?;

    let console_layer = config.console.enabled.then(|| {
        fmt::layer()
            .with_ansi(config.console.colored && std::io::stdout().is_terminal())
            .with_target(true)
            .with_level(true)
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(build_filter(&config.level))
        .try_init()?;

    Ok(())
}

/// `RUST_LOG` wins when set; otherwise the configured level applies.
pub(crate) fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn file_layer(config: &FileConfig) -> Result<BoxedLayer, LoggerError> {
    let writer = Mutex::new(open_log_file(config)?);
    let layer = fmt::layer().with_ansi(false).with_target(true);

    Ok(match config.format {
        LogFormat::Full => layer.with_writer(writer).boxed(),
        LogFormat::Compact => layer.compact().with_writer(writer).boxed(),
        LogFormat::Json => layer.json().with_writer(writer).boxed(),
    })
}

/// Opens the log file, creating parent directories as needed.
pub(crate) fn open_log_file(config: &FileConfig) -> Result<File, LoggerError> {
    if let Some(parent) = config.path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if config.append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    Ok(options.open(&config.path)?)
}
