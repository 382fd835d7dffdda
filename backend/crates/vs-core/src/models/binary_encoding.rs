use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// How an attachment's bytes are rendered inside a JSON payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BinaryEncoding {
    /// Bytes are embedded as-is and must be valid UTF-8
    Raw,
    #[default]
    Base64,
    /// Lowercase hexadecimal
    Hex,
}

impl BinaryEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Base64 => "base64",
            Self::Hex => "hex",
        }
    }

    #[track_caller]
    pub fn encode(&self, data: &[u8]) -> CoreErrorResult<String> {
        match self {
            Self::Raw => String::from_utf8(data.to_vec())
                .map_err(|e| self.attachment_error("encode", e.to_string())),
            Self::Base64 => Ok(STANDARD.encode(data)),
            Self::Hex => Ok(hex::encode(data)),
        }
    }

    #[track_caller]
    pub fn decode(&self, text: &str) -> CoreErrorResult<Vec<u8>> {
        match self {
            Self::Raw => Ok(text.as_bytes().to_vec()),
            Self::Base64 => STANDARD
                .decode(text)
                .map_err(|e| self.attachment_error("decode", e.to_string())),
            Self::Hex => hex::decode(text)
                .map_err(|e| self.attachment_error("decode", e.to_string())),
        }
    }

    #[track_caller]
    fn attachment_error(&self, action: &'static str, message: String) -> CoreError {
        CoreError::Attachment {
            action,
            encoding: self.as_str(),
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl FromStr for BinaryEncoding {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s {
            "raw" => Ok(Self::Raw),
            "base64" => Ok(Self::Base64),
            "hex" => Ok(Self::Hex),
            _ => Err(CoreError::InvalidEncoding {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for BinaryEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
