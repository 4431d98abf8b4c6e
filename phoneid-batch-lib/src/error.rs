//! Error handling for PhoneID batch operations.
//!
//! Only pre-dispatch failures (configuration, credentials, input) surface as
//! `PhoneIdError`. Everything that happens once a batch is running is turned
//! into an [`Outcome`](crate::Outcome) instead.

use std::time::Duration;
use thiserror::Error;

/// Main error type for the library.
#[derive(Debug, Clone, Error)]
pub enum PhoneIdError {
    /// Invalid identifiers or an empty batch
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Configuration errors (invalid settings, bad config file, etc.)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A required credential environment variable is not set
    #[error("Missing environment variable: {variable}")]
    MissingCredential { variable: String },

    /// File I/O errors when reading number lists, addon files or writing reports
    #[error("File error at '{path}': {message}")]
    File { path: String, message: String },
}

impl PhoneIdError {
    /// Create a new invalid input error.
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new missing credential error.
    pub fn missing_credential<V: Into<String>>(variable: V) -> Self {
        Self::MissingCredential {
            variable: variable.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::File {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A transport-level failure: no HTTP response was received.
///
/// Always retryable from the executor's point of view.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout
    #[error("request timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// The connection could not be established
    #[error("connection failed: {message}")]
    Connect { message: String },

    /// Any other request failure (TLS, body, redirect, builder...)
    #[error("request failed: {message}")]
    Request { message: String },
}

impl TransportError {
    pub fn connect<M: Into<String>>(message: M) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    pub fn request<M: Into<String>>(message: M) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Classify a reqwest error, using `timeout` as the reported duration.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout { duration: timeout }
        } else if err.is_connect() {
            Self::connect(err.to_string())
        } else {
            Self::request(err.to_string())
        }
    }
}
