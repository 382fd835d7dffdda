use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;
use vs_core::CoreError;

/// One subject that could not be published during a fan-out
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectFailure {
    pub subject: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Not connected to broker {location}")]
    NotConnected { location: ErrorLocation },

    #[error("Broker connection closed {location}")]
    Closed { location: ErrorLocation },

    #[error("Broker connection error: {message} {location}")]
    Connection {
        message: String,
        location: ErrorLocation,
    },

    #[error("Broker I/O failed: {source} {location}")]
    Io {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Broker protocol error: {message} {location}")]
    Protocol {
        message: String,
        location: ErrorLocation,
    },

    #[error("Publish to {subject} timed out after {timeout_ms}ms {location}")]
    Timeout {
        subject: String,
        timeout_ms: u64,
        location: ErrorLocation,
    },

    #[error("Publish to {subject} failed: {message} {location}")]
    Publish {
        subject: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Validation failed: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Publish rate limit exceeded (capacity {capacity}) {location}")]
    RateLimited {
        capacity: u32,
        location: ErrorLocation,
    },

    #[error("JSON encoding failed: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Published {succeeded} of {total} subjects, failed: {summary} {location}")]
    PartialPublish {
        failed: Vec<SubjectFailure>,
        succeeded: usize,
        total: usize,
        summary: String,
        location: ErrorLocation,
    },

    #[error("failed to connect: {source}")]
    ConnectFailed {
        #[source]
        source: Box<StreamError>,
        location: ErrorLocation,
    },

    #[error("failed to generate moment: {source}")]
    GenerateFailed {
        #[source]
        source: Box<StreamError>,
        location: ErrorLocation,
    },

    #[error("failed to publish moment: {source}")]
    PublishFailed {
        #[source]
        source: Box<StreamError>,
        location: ErrorLocation,
    },
}

impl StreamError {
    #[track_caller]
    pub fn not_connected() -> Self {
        Self::NotConnected {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn closed() -> Self {
        Self::Closed {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn connection<S: Into<String>>(message: S) -> Self {
        Self::Connection {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn protocol<S: Into<String>>(message: S) -> Self {
        Self::Protocol {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn timeout(subject: &str, timeout_ms: u64) -> Self {
        Self::Timeout {
            subject: subject.to_string(),
            timeout_ms,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn publish<S: Into<String>>(subject: &str, message: S) -> Self {
        Self::Publish {
            subject: subject.to_string(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn validation<S: Into<String>>(message: S, field: Option<&str>) -> Self {
        Self::Validation {
            message: message.into(),
            field: field.map(str::to_string),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn rate_limited(capacity: u32) -> Self {
        Self::RateLimited {
            capacity,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn partial_publish(failed: Vec<SubjectFailure>, total: usize) -> Self {
        let summary = failed
            .iter()
            .map(|f| format!("{} ({})", f.subject, f.message))
            .collect::<Vec<_>>()
            .join(", ");
        Self::PartialPublish {
            succeeded: total.saturating_sub(failed.len()),
            failed,
            total,
            summary,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn connect_failed(source: StreamError) -> Self {
        Self::ConnectFailed {
            source: Box::new(source),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn generate_failed(source: StreamError) -> Self {
        Self::GenerateFailed {
            source: Box::new(source),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn publish_failed(source: StreamError) -> Self {
        Self::PublishFailed {
            source: Box::new(source),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Subjects that failed, if this is a fan-out failure
    pub fn failed_subjects(&self) -> Vec<&str> {
        match self {
            Self::PartialPublish { failed, .. } => {
                failed.iter().map(|f| f.subject.as_str()).collect()
            }
            Self::PublishFailed { source, .. } => source.failed_subjects(),
            _ => Vec::new(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotConnected { .. } | Self::Closed { .. } | Self::Connection { .. } => {
                "CONNECTION_ERROR"
            }
            Self::Io { .. } => "IO_ERROR",
            Self::Protocol { .. } => "PROTOCOL_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Publish { .. } => "PUBLISH_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Serialization { .. } => "ENCODE_ERROR",
            Self::Core(core) if core.is_not_found() => "NOT_FOUND",
            Self::Core(CoreError::Validation { .. }) => "VALIDATION_ERROR",
            Self::Core(_) => "ENCODE_ERROR",
            Self::PartialPublish { .. } => "PARTIAL_PUBLISH",
            Self::ConnectFailed { source, .. }
            | Self::GenerateFailed { source, .. }
            | Self::PublishFailed { source, .. } => source.error_code(),
        }
    }

    /// Transient transport failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NotConnected { .. }
                | Self::Connection { .. }
                | Self::Io { .. }
                | Self::Timeout { .. }
        )
    }
}

impl From<std::io::Error> for StreamError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for StreamError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, StreamError>;
