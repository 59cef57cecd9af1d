//! Error types for the planner
//!
//! Each subsystem owns a focused error enum. `PlannerError` is what the
//! store returns and formats into its `error` field.

use thiserror::Error;

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Main error type for the planner
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("No user is logged in")]
    NotLoggedIn,
}

/// Plan backend errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network unavailable: {reason}")]
    Network { reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Response parsing failed: {reason}")]
    Decode { reason: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout
        } else if err.is_decode() {
            ServiceError::Decode {
                reason: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                ServiceError::Unauthorized
            } else {
                ServiceError::Status {
                    status: status.as_u16(),
                    message: err.to_string(),
                }
            }
        } else {
            ServiceError::Network {
                reason: err.to_string(),
            }
        }
    }
}

/// Thumbnail and prefetch errors. Never reach the store's error field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("Thumbnail generation failed for {url}: {reason}")]
    ThumbnailFailed { url: String, reason: String },

    #[error("Thumbnail generator returned nothing for {url}")]
    EmptyThumbnail { url: String },

    #[error("Thumbnail generation not supported: {reason}")]
    Unsupported { reason: String },

    #[error("Prefetch failed for {url}: {reason}")]
    PrefetchFailed { url: String, reason: String },

    #[error("Invalid media URL: {url}")]
    InvalidUrl { url: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config load failed: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid config value: {field} = {value}")]
    InvalidValue { field: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification used when turning errors into user-facing text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Server answered with an error status
    Server,
    /// Connectivity problem or timeout
    Network,
    /// Credentials rejected or missing
    Auth,
    /// Malformed data from the server
    Decode,
    /// Request could not be built locally
    Local,
}

impl PlannerError {
    pub fn class(&self) -> ErrorClass {
        match self {
            PlannerError::Service(e) => e.class(),
            PlannerError::NotLoggedIn => ErrorClass::Auth,
        }
    }
}

impl ServiceError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ServiceError::Status { .. } => ErrorClass::Server,
            ServiceError::Network { .. } | ServiceError::Timeout => ErrorClass::Network,
            ServiceError::Unauthorized => ErrorClass::Auth,
            ServiceError::Decode { .. } => ErrorClass::Decode,
            ServiceError::InvalidRequest { .. } => ErrorClass::Local,
        }
    }
}

/// Turns errors into messages the presentation layer can show as-is
pub trait ErrorFormatter: Send + Sync {
    fn format(&self, err: &PlannerError) -> String;
}

/// Default formatter: server-supplied messages pass through, everything else
/// maps to a short generic sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorFormatter;

impl ErrorFormatter for DefaultErrorFormatter {
    fn format(&self, err: &PlannerError) -> String {
        match err {
            PlannerError::Service(ServiceError::Status { message, .. }) if !message.is_empty() => {
                message.clone()
            }
            other => match other.class() {
                ErrorClass::Server => "The server could not complete the request".to_string(),
                ErrorClass::Network => {
                    "Network unavailable, please check your connection".to_string()
                }
                ErrorClass::Auth => "Please log in again".to_string(),
                ErrorClass::Decode => "Received an unexpected response from the server".to_string(),
                ErrorClass::Local => "Something went wrong".to_string(),
            },
        }
    }
}
