use std::result::Result as StdResult;

use autovalue_config::ConfigError;
use autovalue_core::CoreError;
use thiserror::Error;

/// Broad failure categories, each with its own response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    MethodNotAllowed,
    Store,
    Config,
}

/// Unified error type for the request boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error("Persistence error: {0}")]
    Store(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, ApiError>;

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::MethodNotAllowed(_) => ErrorKind::MethodNotAllowed,
            ApiError::Store(_) => ErrorKind::Store,
            ApiError::Config(_) => ErrorKind::Config,
        }
    }

    /// HTTP status: caller mistakes are 4xx, backend failures 5xx.
    pub fn status(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::MethodNotAllowed => 405,
            ErrorKind::Store | ErrorKind::Config => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }
}

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Command failed: {0}")]
    Command(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(message) => ApiError::NotFound(message),
            CoreError::Validation(message) => ApiError::Validation(message),
            CoreError::Store(message) | CoreError::Serde(message) => ApiError::Store(message),
            CoreError::Io(err) => ApiError::Store(err.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => ApiError::Config(io.to_string()),
            ConfigError::MissingBackup(name) => {
                ApiError::NotFound(format!("configuration backup `{name}`"))
            }
            ConfigError::Serde(message) | ConfigError::Invalid(message) => {
                ApiError::Config(message)
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(ApiError::from(err))
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::from(ApiError::from(err))
    }
}
