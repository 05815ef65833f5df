use crate::ErrorLocation;

use std::panic::Location;
use std::result::Result as StdResult;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid argument: {argument} is required {location}")]
    InvalidArgument {
        argument: &'static str,
        location: ErrorLocation,
    },

    #[error("Invalid operation: {message} {location}")]
    InvalidOperation {
        message: String,
        location: ErrorLocation,
    },

    #[error("Corrupt user document: {message} {location}")]
    CorruptDocument {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON error: {source} {location}")]
    Json {
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("UUID parse error: {source} {location}")]
    Uuid {
        source: uuid::Error,
        location: ErrorLocation,
    },
}

impl CoreError {
    #[track_caller]
    pub fn invalid_argument(argument: &'static str) -> Self {
        Self::InvalidArgument {
            argument,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_operation<S: Into<String>>(message: S) -> Self {
        Self::InvalidOperation {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn corrupt_document<S: Into<String>>(message: S) -> Self {
        Self::CorruptDocument {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<uuid::Error> for CoreError {
    #[track_caller]
    fn from(source: uuid::Error) -> Self {
        Self::Uuid {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Rejects a required string argument that is empty or whitespace-only.
#[track_caller]
pub(crate) fn require(value: &str, argument: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoreError::invalid_argument(argument));
    }
    Ok(())
}

pub type Result<T> = StdResult<T, CoreError>;
