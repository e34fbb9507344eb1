use thiserror::Error;

/// Application-wide error type for everything below the HTTP envelope.
///
/// Handlers never forward these to callers verbatim: authentication and input
/// problems become fail envelopes, everything else is logged and collapsed
/// into an opaque error envelope.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unauthorized access error with authentication message
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Stored procedure invocation failed
    #[error("Stored procedure {procedure} failed")]
    Procedure {
        procedure: String,
        #[source]
        source: anyhow::Error,
    },

    /// A result set row could not be decoded into its domain type
    #[error("Failed to decode result set {index} of {procedure}")]
    Decode {
        procedure: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Wraps a diesel failure raised while running the named procedure.
    pub fn procedure(procedure: impl Into<String>, error: diesel::result::Error) -> Self {
        AppError::Procedure {
            procedure: procedure.into(),
            source: anyhow::Error::from(error),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<bb8::RunError<diesel_async::pooled_connection::PoolError>> for AppError {
    fn from(error: bb8::RunError<diesel_async::pooled_connection::PoolError>) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::from(error),
        }
    }
}

impl From<crate::config::error::ConfigError> for AppError {
    fn from(error: crate::config::error::ConfigError) -> Self {
        AppError::Configuration {
            key: error.field().to_string(),
            source: anyhow::Error::from(error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
