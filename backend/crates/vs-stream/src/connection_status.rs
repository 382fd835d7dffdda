use chrono::{DateTime, Utc};
use serde::Serialize;

/// Broker connection telemetry, handed out by value
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    /// Transport lost the connection and is trying to restore it
    pub reconnecting: bool,
    pub url: Option<String>,
    pub reconnects: u64,
    pub disconnects: u64,
    pub last_connect: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub server_id: Option<String>,
    pub rtt_ms: Option<f64>,
}

impl ConnectionStatus {
    pub fn is_connected_to(&self, url: &str) -> bool {
        self.connected && self.url.as_deref() == Some(url)
    }
}
