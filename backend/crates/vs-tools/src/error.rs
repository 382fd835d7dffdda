use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;
use vs_stream::StreamError;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid request: {message} {location}")]
    InvalidRequest {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Unknown method '{method}' {location}")]
    UnknownMethod {
        method: String,
        location: ErrorLocation,
    },

    #[error("Rate limit exceeded: {limit} requests per {window_secs}s {location}")]
    RateLimitExceeded {
        limit: u32,
        window_secs: u64,
        location: ErrorLocation,
    },

    #[error("Request timed out after {timeout_ms}ms {location}")]
    Timeout {
        timeout_ms: u64,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Stream(#[from] StreamError),
}

impl ToolError {
    #[track_caller]
    pub fn invalid_request<S: Into<String>>(message: S, field: Option<&str>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            field: field.map(str::to_string),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown_method(method: &str) -> Self {
        Self::UnknownMethod {
            method: method.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout {
            timeout_ms,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "INVALID_REQUEST",
            Self::UnknownMethod { .. } => "UNKNOWN_METHOD",
            Self::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Stream(e) => e.error_code(),
        }
    }

    /// Offending request field, when one can be named
    pub fn field(&self) -> Option<String> {
        match self {
            Self::InvalidRequest { field, .. } => field.clone(),
            Self::Stream(StreamError::Validation { field, .. }) => field.clone(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ToolError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::invalid_request(source.to_string(), Some("params"))
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;
