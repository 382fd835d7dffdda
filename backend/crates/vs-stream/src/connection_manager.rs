//! Owns the broker connection, its telemetry and filtered publishing.

use crate::{
    BrokerTransport, ConnectionStatus, Metrics, Result as StreamErrorResult, StreamError,
    Subject, SubjectFailure, TransportEvent, VibeUpdate, subjects,
};

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use chrono::Utc;
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use tokio::sync::{Mutex as AsyncMutex, broadcast};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use vs_core::{Moment, SharingPolicy, VibeSnapshot};

pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(2);

/// Subjects that accepted a publish
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PublishReport {
    pub published: Vec<String>,
}

impl PublishReport {
    pub fn len(&self) -> usize {
        self.published.len()
    }

    pub fn is_empty(&self) -> bool {
        self.published.is_empty()
    }
}

pub struct BrokerConnectionManager {
    transport: Arc<dyn BrokerTransport>,
    status: Arc<RwLock<ConnectionStatus>>,
    publish_timeout: Duration,
    observer: Mutex<Option<JoinHandle<()>>>,
    connect_lock: AsyncMutex<()>,
    metrics: Metrics,
}

impl BrokerConnectionManager {
    pub fn new(transport: Arc<dyn BrokerTransport>, publish_timeout: Duration) -> Self {
        Self {
            transport,
            status: Arc::new(RwLock::new(ConnectionStatus::default())),
            publish_timeout,
            observer: Mutex::new(None),
            connect_lock: AsyncMutex::new(()),
            metrics: Metrics::new(),
        }
    }

    /// Connect to `url`. A no-op when already connected there; a different
    /// URL closes the current connection first. While the transport is
    /// restoring a dropped connection to the same URL this returns
    /// `NotConnected` and leaves the reconnect alone. Transport errors are
    /// returned as-is, retrying is the transport's business.
    pub async fn connect(&self, url: &str) -> StreamErrorResult<()> {
        let _connecting = self.connect_lock.lock().await;

        let (same_url, reconnecting, has_session, counters) = {
            let status = self.status.read();
            (
                status.url.as_deref() == Some(url),
                status.reconnecting,
                status.connected || status.reconnecting,
                (status.reconnects, status.disconnects),
            )
        };
        if same_url && reconnecting {
            debug!("Broker {} is reconnecting, not starting a new connection", url);
            return Err(StreamError::not_connected());
        }
        if same_url && self.is_connected() {
            debug!("Already connected to {}", url);
            return Ok(());
        }
        if has_session {
            if same_url {
                info!("Reopening stale broker connection to {}", url);
            } else {
                info!("Switching broker connection to {}", url);
            }
            self.close().await;
        }
        // Counters describe one broker URL
        let (reconnects, disconnects) = if same_url { counters } else { (0, 0) };

        // Subscribe before connecting so no event is missed
        let events = self.transport.events();

        match self.transport.connect(url).await {
            Ok(server) => {
                {
                    let mut status = self.status.write();
                    *status = ConnectionStatus {
                        connected: true,
                        reconnecting: false,
                        url: Some(url.to_string()),
                        reconnects,
                        disconnects,
                        last_connect: Some(Utc::now()),
                        last_error: None,
                        server_id: Some(server.server_id.clone()),
                        rtt_ms: Some(duration_ms(server.rtt)),
                    };
                }
                self.start_observer(events);
                self.metrics.connection_event("established");
                self.metrics.connected(true);
                info!("Broker connected: {} ({})", url, server.server_id);
                Ok(())
            }
            Err(e) => {
                {
                    let mut status = self.status.write();
                    status.connected = false;
                    status.url = Some(url.to_string());
                    status.last_error = Some(e.to_string());
                }
                self.metrics.connection_event("failed");
                warn!("Broker connection to {} failed: {}", url, e);
                Err(e)
            }
        }
    }

    /// Release the connection. Never fails and always leaves the status
    /// disconnected; calling it again is harmless.
    pub async fn close(&self) {
        if let Some(observer) = self.observer.lock().take() {
            observer.abort();
        }

        let result = self.transport.close().await;

        let mut status = self.status.write();
        let was_connected = status.connected;
        status.connected = false;
        status.reconnecting = false;
        if let Err(e) = result {
            warn!("Error while closing broker connection: {}", e);
            status.last_error = Some(e.to_string());
        }
        if was_connected {
            self.metrics.connection_event("closed");
            self.metrics.connected(false);
            info!("Broker connection closed");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status.read().connected && self.transport.is_connected()
    }

    /// Snapshot of the connection telemetry
    pub fn status(&self) -> ConnectionStatus {
        self.status.read().clone()
    }

    /// Measure and record a fresh round trip
    pub async fn refresh_rtt(&self) -> StreamErrorResult<Duration> {
        let rtt = self.transport.rtt().await?;
        self.status.write().rtt_ms = Some(duration_ms(rtt));
        Ok(rtt)
    }

    /// Subjects for a moment; pure, no connection needed
    pub fn create_moment_subjects(
        &self,
        stream_id: &str,
        moment: &Moment,
    ) -> StreamErrorResult<Vec<Subject>> {
        subjects::moment_subjects(stream_id, moment)
    }

    /// Publish each subject's projection of `moment`.
    ///
    /// All payloads are encoded before anything is sent, so an encoding
    /// error publishes nothing. Per-subject publish failures are collected
    /// into `StreamError::PartialPublish`; subjects that succeeded stay
    /// published.
    pub async fn publish_moment(
        &self,
        moment: &Moment,
        subjects: &[Subject],
    ) -> StreamErrorResult<PublishReport> {
        if subjects.is_empty() {
            return Ok(PublishReport::default());
        }
        if !self.is_connected() {
            return Err(StreamError::not_connected());
        }

        let payloads = subjects
            .iter()
            .map(|subject| {
                let view = moment.project(subject.audience.context_level(&moment.sharing))?;
                Ok((subject, Bytes::from(view.to_json_bytes()?)))
            })
            .collect::<StreamErrorResult<Vec<_>>>()?;

        self.publish_all(payloads).await
    }

    /// Publish a world's vibe to the vibe subjects for its audience
    pub async fn publish_vibe_update(
        &self,
        stream_id: &str,
        world_id: &str,
        creator_id: &str,
        sharing: &SharingPolicy,
        vibe: &VibeSnapshot,
    ) -> StreamErrorResult<PublishReport> {
        let subjects = subjects::vibe_subjects(stream_id, world_id, creator_id, sharing)?;
        if subjects.is_empty() {
            return Ok(PublishReport::default());
        }
        if !self.is_connected() {
            return Err(StreamError::not_connected());
        }

        let timestamp = Utc::now();
        let payloads = subjects
            .iter()
            .map(|subject| {
                let update = VibeUpdate::project(
                    world_id,
                    timestamp,
                    vibe,
                    subject.audience.context_level(sharing),
                );
                Ok((subject, Bytes::from(serde_json::to_vec(&update)?)))
            })
            .collect::<StreamErrorResult<Vec<_>>>()?;

        self.publish_all(payloads).await
    }

    async fn publish_all(
        &self,
        payloads: Vec<(&Subject, Bytes)>,
    ) -> StreamErrorResult<PublishReport> {
        let total = payloads.len();
        let timeout_ms = self.publish_timeout.as_millis() as u64;
        let mut report = PublishReport::default();
        let mut failed = Vec::new();

        for (subject, payload) in payloads {
            let started = Instant::now();
            let result = match timeout(
                self.publish_timeout,
                self.transport.publish(&subject.name, payload),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(StreamError::timeout(&subject.name, timeout_ms)),
            };

            match result {
                Ok(()) => {
                    self.metrics.publish_succeeded(started.elapsed());
                    debug!("Published to {}", subject.name);
                    report.published.push(subject.name.clone());
                }
                Err(e) => {
                    self.metrics.publish_failed(e.error_code());
                    warn!("Publish to {} failed: {}", subject.name, e);
                    failed.push(SubjectFailure {
                        subject: subject.name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if failed.is_empty() {
            Ok(report)
        } else {
            Err(StreamError::partial_publish(failed, total))
        }
    }

    fn start_observer(&self, mut events: broadcast::Receiver<TransportEvent>) {
        let status = Arc::clone(&self.status);
        let metrics = self.metrics.clone();

        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => apply_event(&status, &metrics, event),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!("Missed {} broker connection events", missed);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        if let Some(previous) = self.observer.lock().replace(handle) {
            previous.abort();
        }
    }
}

impl Drop for BrokerConnectionManager {
    fn drop(&mut self) {
        if let Some(observer) = self.observer.get_mut().take() {
            observer.abort();
        }
    }
}

fn apply_event(status: &RwLock<ConnectionStatus>, metrics: &Metrics, event: TransportEvent) {
    let mut status = status.write();
    match event {
        TransportEvent::Disconnected { reason } => {
            status.connected = false;
            status.reconnecting = true;
            status.disconnects += 1;
            status.last_error = Some(reason);
            metrics.connection_event("disconnected");
            metrics.connected(false);
        }
        TransportEvent::Reconnected { server_id, rtt } => {
            status.connected = true;
            status.reconnecting = false;
            status.reconnects += 1;
            status.last_connect = Some(Utc::now());
            status.server_id = Some(server_id);
            status.rtt_ms = Some(duration_ms(rtt));
            metrics.connection_event("reconnected");
            metrics.connected(true);
        }
        TransportEvent::ReconnectFailed { reason } => {
            status.connected = false;
            status.reconnecting = false;
            status.last_error = Some(reason);
            metrics.connection_event("reconnect_failed");
        }
        TransportEvent::ServerError { message } => {
            status.last_error = Some(message);
            metrics.connection_event("server_error");
        }
    }
}

fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
