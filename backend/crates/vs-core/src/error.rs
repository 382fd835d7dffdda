use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("world not found: {world_id} {location}")]
    WorldNotFound {
        world_id: String,
        location: ErrorLocation,
    },

    #[error("vibe not found: {vibe_id} {location}")]
    VibeNotFound {
        vibe_id: String,
        location: ErrorLocation,
    },

    #[error("World {world_id} has no vibe assigned {location}")]
    NoVibeAssigned {
        world_id: String,
        location: ErrorLocation,
    },

    #[error("Invalid world kind: {value} {location}")]
    InvalidWorldKind {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid context level: {value} {location}")]
    InvalidContextLevel {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid binary encoding: {value} {location}")]
    InvalidEncoding {
        value: String,
        location: ErrorLocation,
    },

    #[error("Cannot {action} {encoding} attachment: {message} {location}")]
    Attachment {
        action: &'static str,
        encoding: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON serialization failed: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl CoreError {
    #[track_caller]
    pub fn validation<S: Into<String>>(message: S, field: Option<&str>) -> Self {
        Self::Validation {
            message: message.into(),
            field: field.map(str::to_string),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn world_not_found(world_id: &str) -> Self {
        Self::WorldNotFound {
            world_id: world_id.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn vibe_not_found(vibe_id: &str) -> Self {
        Self::VibeNotFound {
            vibe_id: vibe_id.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn no_vibe_assigned(world_id: &str) -> Self {
        Self::NoVibeAssigned {
            world_id: world_id.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// True for lookups that failed because the identifier does not resolve
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::WorldNotFound { .. } | Self::VibeNotFound { .. } | Self::NoVibeAssigned { .. }
        )
    }
}

impl From<serde_json::Error> for CoreError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = StdResult<T, CoreError>;
