//! Broker that lives inside the process, addressed as `memory://...`.
//!
//! Used for local runs without a NATS server and as the test double for
//! fan-out behaviour: it records every publish and can be told to fail
//! specific subjects or drop the connection.

use crate::{
    BrokerTransport, Result as StreamErrorResult, ServerInfo, StreamError, TransportEvent,
};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, info};
use parking_lot::RwLock;
use tokio::sync::broadcast;

pub const MEMORY_SCHEME: &str = "memory://";

const SERVER_ID: &str = "in-process";
const CHANNEL_CAPACITY: usize = 256;
const EVENT_CAPACITY: usize = 16;
const MAX_PAYLOAD: usize = 1024 * 1024;

/// A message accepted by the in-process broker
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMessage {
    pub subject: String,
    pub payload: Bytes,
}

#[derive(Default)]
struct BrokerInner {
    url: Option<String>,
    suspended: bool,
    channels: HashMap<String, broadcast::Sender<PublishedMessage>>,
    published: Vec<PublishedMessage>,
    failing_subjects: HashSet<String>,
    refuse_connections: bool,
    fail_close: bool,
}

#[derive(Clone)]
pub struct InProcessBroker {
    inner: Arc<RwLock<BrokerInner>>,
    events: broadcast::Sender<TransportEvent>,
}

impl InProcessBroker {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(BrokerInner::default())),
            events,
        }
    }

    /// Receive every message published to `subject` from now on
    pub fn subscribe(&self, subject: &str) -> broadcast::Receiver<PublishedMessage> {
        let mut inner = self.inner.write();
        inner
            .channels
            .entry(subject.to_string())
            .or_insert_with(|| {
                debug!("Created in-process channel for {}", subject);
                broadcast::channel(CHANNEL_CAPACITY).0
            })
            .subscribe()
    }

    /// Every accepted message in publish order
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.inner.read().published.clone()
    }

    pub fn published_subjects(&self) -> Vec<String> {
        self.inner
            .read()
            .published
            .iter()
            .map(|m| m.subject.clone())
            .collect()
    }

    pub fn clear_published(&self) {
        self.inner.write().published.clear();
    }

    /// Make publishes to `subject` fail until cleared
    pub fn fail_subject(&self, subject: &str) {
        self.inner.write().failing_subjects.insert(subject.to_string());
    }

    pub fn clear_failures(&self) {
        self.inner.write().failing_subjects.clear();
    }

    pub fn refuse_connections(&self, refuse: bool) {
        self.inner.write().refuse_connections = refuse;
    }

    /// Make `close()` report an error (the broker still disconnects)
    pub fn fail_close(&self, fail: bool) {
        self.inner.write().fail_close = fail;
    }

    /// Drop the connection as if the network went away
    pub fn simulate_disconnect(&self, reason: &str) {
        {
            let mut inner = self.inner.write();
            if inner.url.is_none() {
                return;
            }
            inner.suspended = true;
        }
        let _ = self.events.send(TransportEvent::Disconnected {
            reason: reason.to_string(),
        });
    }

    /// Restore a connection dropped by `simulate_disconnect`
    pub fn simulate_reconnect(&self) {
        {
            let mut inner = self.inner.write();
            if inner.url.is_none() || !inner.suspended {
                return;
            }
            inner.suspended = false;
        }
        let _ = self.events.send(TransportEvent::Reconnected {
            server_id: SERVER_ID.to_string(),
            rtt: Duration::ZERO,
        });
    }
}

impl Default for InProcessBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrokerTransport for InProcessBroker {
    async fn connect(&self, url: &str) -> StreamErrorResult<ServerInfo> {
        if !url.starts_with(MEMORY_SCHEME) {
            return Err(StreamError::connection(format!(
                "in-process broker cannot serve {url}"
            )));
        }

        let mut inner = self.inner.write();
        if inner.refuse_connections {
            return Err(StreamError::connection(format!("connection refused: {url}")));
        }

        inner.url = Some(url.to_string());
        inner.suspended = false;
        info!("Connected to in-process broker {}", url);

        Ok(ServerInfo {
            server_id: SERVER_ID.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            max_payload: MAX_PAYLOAD,
            rtt: Duration::ZERO,
        })
    }

    async fn publish(&self, subject: &str, payload: Bytes) -> StreamErrorResult<()> {
        let mut inner = self.inner.write();
        if inner.url.is_none() || inner.suspended {
            return Err(StreamError::not_connected());
        }
        if inner.failing_subjects.contains(subject) {
            return Err(StreamError::publish(subject, "rejected by broker"));
        }
        if payload.len() > MAX_PAYLOAD {
            return Err(StreamError::publish(
                subject,
                format!("payload of {} bytes exceeds {}", payload.len(), MAX_PAYLOAD),
            ));
        }

        let message = PublishedMessage {
            subject: subject.to_string(),
            payload,
        };
        if let Some(sender) = inner.channels.get(subject) {
            // No receivers is fine: at-most-once, best effort
            let _ = sender.send(message.clone());
        }
        inner.published.push(message);
        Ok(())
    }

    async fn rtt(&self) -> StreamErrorResult<Duration> {
        if self.is_connected() {
            Ok(Duration::ZERO)
        } else {
            Err(StreamError::not_connected())
        }
    }

    async fn close(&self) -> StreamErrorResult<()> {
        let mut inner = self.inner.write();
        inner.url = None;
        inner.suspended = false;
        if inner.fail_close {
            return Err(StreamError::connection("close failed"));
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        let inner = self.inner.read();
        inner.url.is_some() && !inner.suspended
    }

    fn events(&self) -> broadcast::Receiver<TransportEvent> {
        self.events.subscribe()
    }
}
