use action_core::error::CoreError;
use action_core::error::compile::CompileError;
use action_core::error::config::ConfigError;
use action_core::error::server::ServerError;

use common::ErrorLocation;

use thiserror::Error;

/// Anything that stops the binary. `main` logs it and exits with status 1.
#[derive(Debug, Error)]
pub enum AppError {
    /// Logger could not be set up
    #[error("Logger Error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },

    /// Startup wiring outside the core (directories, arguments)
    #[error("Startup Error: {message} {location}")]
    Startup {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        AppError::Core(error.into())
    }
}

impl From<CompileError> for AppError {
    fn from(error: CompileError) -> Self {
        AppError::Core(error.into())
    }
}

impl From<ServerError> for AppError {
    fn from(error: ServerError) -> Self {
        AppError::Core(error.into())
    }
}
