use common::ErrorLocation;

use std::io::Error as IoError;

use thiserror::Error as ThisError;

/// Failure to run a script at all. Never reaches an HTTP caller.
#[derive(Debug, ThisError)]
pub enum ExecError {
    #[error("Script Spawn Error: {message} {location}")]
    Spawn {
        message: String,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },
}
