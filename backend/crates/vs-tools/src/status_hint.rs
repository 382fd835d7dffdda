use serde::Serialize;
use vs_stream::{ConnectionStatus, StreamingStatus};

/// Coarse state shown next to a streaming status, with its display color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusHint {
    Streaming,
    Idle,
    Reconnecting,
    Disconnected,
    Error,
}

impl StatusHint {
    /// Reconnecting wins over everything else. An active loop is streaming
    /// while connected, in error after a failed connect and disconnected
    /// before its first connect. An inactive loop is idle.
    pub fn derive(active: bool, connection: &ConnectionStatus) -> Self {
        if connection.reconnecting {
            return Self::Reconnecting;
        }

        match (active, connection.connected) {
            (true, true) => Self::Streaming,
            (true, false) if connection.last_error.is_some() => Self::Error,
            (true, false) => Self::Disconnected,
            (false, _) => Self::Idle,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Streaming => "streaming",
            Self::Idle => "idle",
            Self::Reconnecting => "reconnecting",
            Self::Disconnected => "disconnected",
            Self::Error => "error",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Streaming => "green",
            Self::Idle => "blue",
            Self::Reconnecting => "yellow",
            Self::Disconnected => "gray",
            Self::Error => "red",
        }
    }
}

impl Serialize for StatusHint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut hint = serializer.serialize_struct("StatusHint", 2)?;
        hint.serialize_field("state", self.label())?;
        hint.serialize_field("color", self.color())?;
        hint.end()
    }
}

/// `stream.status` result: the orchestrator status plus its UI hint
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    #[serde(flatten)]
    pub status: StreamingStatus,
    pub hint: StatusHint,
}

impl From<StreamingStatus> for StatusReport {
    fn from(status: StreamingStatus) -> Self {
        let hint = StatusHint::derive(status.active, &status.connection);
        Self { status, hint }
    }
}
