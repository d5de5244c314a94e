//! Error types shared by the remote service and the list synchronizer

use thiserror::Error;

/// Main error type for weather location operations
#[derive(Error, Debug)]
pub enum LocationError {
    /// Fetching the location list failed
    #[error("List update failed")]
    Generic,

    /// The server did not accept a new location
    #[error("Failed to add location")]
    CannotAdd,

    /// The server did not remove a location, or the location is unknown locally
    #[error("Failed to remove location")]
    CannotRemove,

    /// Transport-level failure (DNS, TLS, connection reset, timeout)
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("Invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Location could not be serialized for sending
    #[error("Failed to encode location: {0}")]
    Encode(#[source] serde_json::Error),

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Settings store errors
    #[error("Settings store error: {message}")]
    Storage { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl LocationError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new settings store error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            LocationError::Generic => "List update failed".to_string(),
            LocationError::CannotAdd => "Failed to add location".to_string(),
            LocationError::CannotRemove => "Failed to remove location".to_string(),
            other => {
                let description = other.to_string();
                if description.trim().is_empty() {
                    format!("{other:?}")
                } else {
                    description
                }
            }
        }
    }
}
