use thiserror::Error;

/// Failures while building the log outputs
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("cannot open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid logger configuration: {message}")]
    Config { message: String },

    #[error("global subscriber already installed: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

impl LoggerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
