use crate::Result as StreamErrorResult;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::broadcast;

/// What the broker told us during the handshake
#[derive(Debug, Clone, PartialEq)]
pub struct ServerInfo {
    pub server_id: String,
    pub version: String,
    pub max_payload: usize,
    /// Round trip of the handshake PING
    pub rtt: Duration,
}

/// Connection lifecycle notifications emitted by a transport
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Disconnected { reason: String },
    Reconnected { server_id: String, rtt: Duration },
    /// Supervised reconnect gave up
    ReconnectFailed { reason: String },
    /// Server-reported error that did not drop the connection
    ServerError { message: String },
}

/// A publish-only client for a subject-based message broker.
///
/// Transports own their reconnect policy. Callers observe it through
/// `events()` and never retry a failed `connect` themselves.
#[async_trait]
pub trait BrokerTransport: Send + Sync {
    async fn connect(&self, url: &str) -> StreamErrorResult<ServerInfo>;

    async fn publish(&self, subject: &str, payload: Bytes) -> StreamErrorResult<()>;

    /// Measure a fresh round trip to the broker
    async fn rtt(&self) -> StreamErrorResult<Duration>;

    async fn close(&self) -> StreamErrorResult<()>;

    fn is_connected(&self) -> bool;

    fn events(&self) -> broadcast::Receiver<TransportEvent>;
}
