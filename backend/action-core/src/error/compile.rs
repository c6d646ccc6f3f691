use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CompileError {
    #[error("Invalid Menu Error: menu #{index}: {message} {location}")]
    InvalidMenu {
        index: usize,
        message: String,
        location: ErrorLocation,
    },

    #[error("Menu Payload Error: {message} {location}")]
    Payload {
        message: String,
        location: ErrorLocation,
    },
}

impl From<serde_json::Error> for CompileError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        CompileError::Payload {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<models::ModelError> for CompileError {
    #[track_caller]
    fn from(error: models::ModelError) -> Self {
        CompileError::Payload {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
