use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Privacy tier controlling how much of a moment a non-creator recipient sees.
///
/// Field sets per level:
/// - `None`: world id, timestamp
/// - `Partial`: adds creator, world core fields and the vibe snapshot
/// - `Full`: adds viewers, sharing policy, sensors, custom payload and attachment
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ContextLevel {
    None,
    #[default]
    Partial,
    Full,
}

impl ContextLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Partial => "partial",
            Self::Full => "full",
        }
    }

    /// Creator, world core fields and vibe snapshot
    pub fn includes_core(&self) -> bool {
        *self >= Self::Partial
    }

    /// Viewers, sharing, sensors, custom payload and attachment
    pub fn includes_detail(&self) -> bool {
        *self == Self::Full
    }
}

impl FromStr for ContextLevel {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s {
            "none" => Ok(Self::None),
            "partial" => Ok(Self::Partial),
            "full" => Ok(Self::Full),
            _ => Err(CoreError::InvalidContextLevel {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for ContextLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
