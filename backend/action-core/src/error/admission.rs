//! Request-time admission failures.
//!
//! Both variants end up as a bare HTTP 500; the detail is for the log only.

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AdmissionError {
    #[error("Unknown Action Error: '{action}' {location}")]
    UnknownAction {
        action: String,
        location: ErrorLocation,
    },

    #[error("Bad Input Error: {message} {location}")]
    BadInput {
        message: String,
        location: ErrorLocation,
    },
}

impl AdmissionError {
    #[track_caller]
    pub fn unknown_action(action: impl Into<String>) -> Self {
        AdmissionError::UnknownAction {
            action: action.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn bad_input(message: impl Into<String>) -> Self {
        AdmissionError::BadInput {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Short label for log lines.
    pub fn category(&self) -> &'static str {
        match self {
            AdmissionError::UnknownAction { .. } => "unknown_action",
            AdmissionError::BadInput { .. } => "bad_input",
        }
    }
}
