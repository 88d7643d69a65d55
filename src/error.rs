//! Error types for the iqsync CLI

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for iqsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit code for a fatal error.
    ///
    /// Configuration/initialization problems exit with 2 so wrappers can
    /// tell "fix your environment" apart from runtime failures (1).
    /// Per-item errors during a run never reach this path; they are
    /// counted and reported, and the process exits 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config(_) => 2,
            _ => 1,
        }
    }
}

/// API-related errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{method} {endpoint} returned HTTP {status}")]
    Status {
        method: String,
        endpoint: String,
        status: StatusCode,
    },

    #[error("{method} {endpoint} returned HTTP {status}, expected {expected}")]
    UnexpectedStatus {
        method: String,
        endpoint: String,
        status: StatusCode,
        expected: StatusCode,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error("Organization configuration file not found: {0}")]
    OrgFileNotFound(String),

    #[error("Invalid JSON in organization configuration: {0}")]
    OrgFileInvalid(String),

    #[error("No valid organizations found in configuration")]
    NoOrganizations,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
