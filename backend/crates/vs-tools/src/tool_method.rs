use crate::{Result as ToolErrorResult, ToolError};

use std::fmt;
use std::str::FromStr;

/// Methods the dispatcher answers; each maps to one orchestrator operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolMethod {
    Start,
    Stop,
    Status,
    StreamWorld,
    StreamVibe,
    UpdateConfig,
}

impl ToolMethod {
    pub const ALL: [ToolMethod; 6] = [
        Self::Start,
        Self::Stop,
        Self::Status,
        Self::StreamWorld,
        Self::StreamVibe,
        Self::UpdateConfig,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "stream.start",
            Self::Stop => "stream.stop",
            Self::Status => "stream.status",
            Self::StreamWorld => "stream.world",
            Self::StreamVibe => "stream.vibe",
            Self::UpdateConfig => "stream.config",
        }
    }
}

impl FromStr for ToolMethod {
    type Err = ToolError;

    #[track_caller]
    fn from_str(s: &str) -> ToolErrorResult<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| ToolError::unknown_method(s))
    }
}

impl fmt::Display for ToolMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
