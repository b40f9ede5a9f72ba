//! Error types and handling for the `SkyCast` application
//!
//! Expected pipeline outcomes (unknown city, upstream timeout, empty result)
//! are not errors; they are modelled as tagged outcomes in the geocoder,
//! fetcher and pipeline modules. `SkycastError` covers the failures that do
//! abort an operation: bad configuration, invalid caller input, server setup.

use thiserror::Error;

/// Main error type for the `SkyCast` application
#[derive(Error, Debug)]
pub enum SkycastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Comparison table construction errors
    #[error("Alignment error: {message}")]
    Alignment { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SkycastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new alignment error
    pub fn alignment<S: Into<String>>(message: S) -> Self {
        Self::Alignment {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkycastError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            SkycastError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            SkycastError::Alignment { .. } => "Error creating comparison table.".to_string(),
            SkycastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
