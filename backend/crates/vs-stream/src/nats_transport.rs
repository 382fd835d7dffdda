//! Publish-side client for the NATS text protocol.
//!
//! Handshake: read `INFO`, send `CONNECT` + `PING`, wait for `PONG`. After
//! that a supervisor task owns the read half. It answers server `PING`s,
//! resolves RTT probes and, when the socket drops, reconnects with backoff.

use crate::{
    BrokerTransport, Result as StreamErrorResult, RetryConfig, ServerInfo, StreamError,
    TransportEvent, with_retry,
};

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex as AsyncMutex, broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use vs_config::{BrokerConfig, ReconnectConfig};

pub const NATS_SCHEME: &str = "nats://";
pub const DEFAULT_NATS_PORT: u16 = 4222;

const EVENT_CAPACITY: usize = 16;
const MAX_CONTROL_LINE: usize = 64 * 1024;
const DEFAULT_MAX_PAYLOAD: usize = 1024 * 1024;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct NatsOptions {
    /// Announced in CONNECT
    pub client_name: String,
    /// Bounds the TCP connect plus handshake, and each RTT probe
    pub connect_timeout: Duration,
    pub reconnect_enabled: bool,
    pub reconnect: RetryConfig,
}

impl Default for NatsOptions {
    fn default() -> Self {
        Self {
            client_name: String::from("vibestream"),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            reconnect_enabled: true,
            reconnect: RetryConfig::default(),
        }
    }
}

impl NatsOptions {
    pub fn from_config(broker: &BrokerConfig, reconnect: &ReconnectConfig) -> Self {
        Self {
            client_name: broker.client_name.clone(),
            connect_timeout: Duration::from_secs(broker.connect_timeout_secs),
            reconnect_enabled: reconnect.enabled,
            reconnect: RetryConfig::from(reconnect),
        }
    }
}

fn default_max_payload() -> usize {
    DEFAULT_MAX_PAYLOAD
}

#[derive(Deserialize)]
struct InfoMessage {
    #[serde(default)]
    server_id: String,
    #[serde(default)]
    version: String,
    #[serde(default = "default_max_payload")]
    max_payload: usize,
}

#[derive(Serialize)]
struct ConnectMessage<'a> {
    verbose: bool,
    pedantic: bool,
    lang: &'static str,
    version: &'static str,
    name: &'a str,
    protocol: u8,
    echo: bool,
}

#[derive(Debug, PartialEq)]
pub(crate) enum ServerOp {
    Info,
    Ping,
    Pong,
    Ok,
    Err(String),
    Other(String),
}

pub(crate) fn parse_op(line: &str) -> ServerOp {
    let head = line
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase();
    match head.as_str() {
        "INFO" => ServerOp::Info,
        "PING" => ServerOp::Ping,
        "PONG" => ServerOp::Pong,
        "+OK" => ServerOp::Ok,
        "-ERR" => ServerOp::Err(
            line.get(4..)
                .unwrap_or_default()
                .trim()
                .trim_matches('\'')
                .to_string(),
        ),
        _ => ServerOp::Other(line.to_string()),
    }
}

/// `nats://host[:port]` to a socket address, defaulting the port
pub(crate) fn server_address(url: &str) -> StreamErrorResult<String> {
    let authority = url
        .strip_prefix(NATS_SCHEME)
        .map(|rest| rest.trim_end_matches('/'))
        .ok_or_else(|| {
            StreamError::connection(format!(
                "unsupported broker URL {url}, expected {NATS_SCHEME}host:port"
            ))
        })?;

    if authority.is_empty() || authority.contains('/') {
        return Err(StreamError::connection(format!(
            "invalid broker URL {url}"
        )));
    }

    let has_port = authority
        .rsplit_once(':')
        .is_some_and(|(_, port)| port.parse::<u16>().is_ok());
    if has_port {
        Ok(authority.to_string())
    } else {
        Ok(format!("{authority}:{DEFAULT_NATS_PORT}"))
    }
}

async fn read_control_line(
    reader: &mut BufReader<OwnedReadHalf>,
) -> StreamErrorResult<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    if line.len() > MAX_CONTROL_LINE {
        return Err(StreamError::protocol(format!(
            "control line of {} bytes exceeds {}",
            line.len(),
            MAX_CONTROL_LINE
        )));
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    info: ServerInfo,
}

async fn establish(url: &str, options: &NatsOptions) -> StreamErrorResult<Connection> {
    let address = server_address(url)?;
    timeout(options.connect_timeout, handshake(&address, &options.client_name))
        .await
        .map_err(|_| {
            StreamError::connection(format!(
                "timed out after {:?} connecting to {address}",
                options.connect_timeout
            ))
        })?
}

async fn handshake(address: &str, client_name: &str) -> StreamErrorResult<Connection> {
    let stream = TcpStream::connect(address)
        .await
        .map_err(|e| StreamError::connection(format!("{address}: {e}")))?;
    stream.set_nodelay(true)?;

    let (read_half, mut writer) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let line = read_control_line(&mut reader)
        .await?
        .ok_or_else(|| StreamError::connection("server closed connection before INFO"))?;
    let info: InfoMessage = match line.strip_prefix("INFO ") {
        Some(json) => serde_json::from_str(json)?,
        None => return Err(StreamError::protocol(format!("expected INFO, got '{line}'"))),
    };

    let connect = ConnectMessage {
        verbose: false,
        pedantic: false,
        lang: "rust",
        version: env!("CARGO_PKG_VERSION"),
        name: client_name,
        protocol: 1,
        echo: false,
    };
    let frame = format!("CONNECT {}\r\nPING\r\n", serde_json::to_string(&connect)?);
    let started = Instant::now();
    writer.write_all(frame.as_bytes()).await?;

    loop {
        let line = read_control_line(&mut reader)
            .await?
            .ok_or_else(|| StreamError::connection("server closed connection during handshake"))?;
        match parse_op(&line) {
            ServerOp::Pong => break,
            ServerOp::Ping => writer.write_all(b"PONG\r\n").await?,
            ServerOp::Err(message) => return Err(StreamError::protocol(message)),
            _ => {}
        }
    }

    Ok(Connection {
        reader,
        writer,
        info: ServerInfo {
            server_id: info.server_id,
            version: info.version,
            max_payload: info.max_payload,
            rtt: started.elapsed(),
        },
    })
}

#[derive(Default)]
struct SessionState {
    url: Option<String>,
    connected: bool,
    closing: bool,
    max_payload: usize,
    pending_pongs: VecDeque<oneshot::Sender<()>>,
    supervisor: Option<JoinHandle<()>>,
}

struct Shared {
    options: NatsOptions,
    state: Mutex<SessionState>,
    writer: AsyncMutex<Option<OwnedWriteHalf>>,
    events: broadcast::Sender<TransportEvent>,
}

impl Shared {
    fn emit(&self, event: TransportEvent) {
        let _ = self.events.send(event);
    }

    fn is_closing(&self) -> bool {
        self.state.lock().closing
    }

    async fn write_frame(&self, frame: &[u8]) -> StreamErrorResult<()> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or_else(|| StreamError::not_connected())?;
        writer.write_all(frame).await?;
        Ok(())
    }

    async fn install(&self, writer: OwnedWriteHalf, info: &ServerInfo) {
        *self.writer.lock().await = Some(writer);
        let mut state = self.state.lock();
        state.connected = true;
        state.max_payload = info.max_payload;
    }

    async fn mark_disconnected(&self) {
        {
            let mut state = self.state.lock();
            state.connected = false;
            state.pending_pongs.clear();
        }
        self.writer.lock().await.take();
    }

    /// Serve the read half until it fails; returns why
    async fn read_until_closed(&self, reader: &mut BufReader<OwnedReadHalf>) -> String {
        loop {
            let line = match read_control_line(reader).await {
                Ok(Some(line)) => line,
                Ok(None) => return String::from("connection closed by server"),
                Err(e) => return e.to_string(),
            };

            match parse_op(&line) {
                ServerOp::Ping => {
                    if let Err(e) = self.write_frame(b"PONG\r\n").await {
                        return e.to_string();
                    }
                }
                ServerOp::Pong => {
                    let waiter = self.state.lock().pending_pongs.pop_front();
                    if let Some(waiter) = waiter {
                        let _ = waiter.send(());
                    }
                }
                ServerOp::Err(message) => {
                    warn!("Broker reported error: {}", message);
                    self.emit(TransportEvent::ServerError { message });
                }
                ServerOp::Info | ServerOp::Ok => {}
                ServerOp::Other(line) => debug!("Ignoring broker line: {}", line),
            }
        }
    }
}

async fn supervise(shared: Arc<Shared>, url: String, mut reader: BufReader<OwnedReadHalf>) {
    loop {
        let reason = shared.read_until_closed(&mut reader).await;
        if shared.is_closing() {
            return;
        }

        shared.mark_disconnected().await;
        warn!("Lost connection to {}: {}", url, reason);
        shared.emit(TransportEvent::Disconnected {
            reason: reason.clone(),
        });

        if !shared.options.reconnect_enabled {
            shared.emit(TransportEvent::ReconnectFailed {
                reason: String::from("reconnect disabled"),
            });
            return;
        }

        let attempt = with_retry(&shared.options.reconnect, "broker reconnect", || {
            let shared = Arc::clone(&shared);
            let url = url.clone();
            async move {
                if shared.is_closing() {
                    return Err(StreamError::closed());
                }
                establish(&url, &shared.options).await
            }
        })
        .await;

        match attempt {
            Ok(connection) => {
                if shared.is_closing() {
                    return;
                }
                let Connection {
                    reader: next_reader,
                    writer,
                    info,
                } = connection;
                shared.install(writer, &info).await;
                reader = next_reader;

                info!("Reconnected to {} ({})", url, info.server_id);
                shared.emit(TransportEvent::Reconnected {
                    server_id: info.server_id,
                    rtt: info.rtt,
                });
            }
            Err(e) => {
                shared.emit(TransportEvent::ReconnectFailed {
                    reason: e.to_string(),
                });
                return;
            }
        }
    }
}

pub struct NatsTransport {
    shared: Arc<Shared>,
}

impl NatsTransport {
    pub fn new(options: NatsOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                options,
                state: Mutex::new(SessionState::default()),
                writer: AsyncMutex::new(None),
                events,
            }),
        }
    }

    pub fn url(&self) -> Option<String> {
        self.shared.state.lock().url.clone()
    }
}

impl Drop for NatsTransport {
    fn drop(&mut self) {
        if let Some(handle) = self.shared.state.lock().supervisor.take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl BrokerTransport for NatsTransport {
    async fn connect(&self, url: &str) -> StreamErrorResult<ServerInfo> {
        if self.is_connected() {
            let _ = self.close().await;
        }

        let Connection {
            reader,
            writer,
            info,
        } = establish(url, &self.shared.options).await?;

        {
            let mut state = self.shared.state.lock();
            state.closing = false;
            state.url = Some(url.to_string());
        }
        self.shared.install(writer, &info).await;

        let supervisor = tokio::spawn(supervise(
            Arc::clone(&self.shared),
            url.to_string(),
            reader,
        ));
        let previous = self.shared.state.lock().supervisor.replace(supervisor);
        if let Some(previous) = previous {
            previous.abort();
        }

        info!(
            "Connected to NATS server {} at {} (rtt {:?})",
            info.server_id, url, info.rtt
        );
        Ok(info)
    }

    async fn publish(&self, subject: &str, payload: Bytes) -> StreamErrorResult<()> {
        let max_payload = {
            let state = self.shared.state.lock();
            if !state.connected {
                return Err(StreamError::not_connected());
            }
            state.max_payload
        };

        if subject.is_empty() || subject.chars().any(char::is_whitespace) {
            return Err(StreamError::validation(
                format!("invalid subject '{subject}'"),
                Some("subject"),
            ));
        }
        if payload.len() > max_payload {
            return Err(StreamError::publish(
                subject,
                format!("payload of {} bytes exceeds {}", payload.len(), max_payload),
            ));
        }

        let header = format!("PUB {} {}\r\n", subject, payload.len());
        let mut frame = BytesMut::with_capacity(header.len() + payload.len() + 2);
        frame.put_slice(header.as_bytes());
        frame.put_slice(&payload);
        frame.put_slice(b"\r\n");

        self.shared.write_frame(&frame).await
    }

    async fn rtt(&self) -> StreamErrorResult<Duration> {
        let (tx, rx) = oneshot::channel();
        {
            let mut state = self.shared.state.lock();
            if !state.connected {
                return Err(StreamError::not_connected());
            }
            state.pending_pongs.push_back(tx);
        }

        let started = Instant::now();
        self.shared.write_frame(b"PING\r\n").await?;

        match timeout(self.shared.options.connect_timeout, rx).await {
            Ok(Ok(())) => Ok(started.elapsed()),
            Ok(Err(_)) => Err(StreamError::not_connected()),
            Err(_) => Err(StreamError::timeout(
                "PING",
                self.shared.options.connect_timeout.as_millis() as u64,
            )),
        }
    }

    async fn close(&self) -> StreamErrorResult<()> {
        let supervisor = {
            let mut state = self.shared.state.lock();
            state.closing = true;
            state.connected = false;
            state.pending_pongs.clear();
            state.supervisor.take()
        };
        if let Some(handle) = supervisor {
            handle.abort();
        }

        let writer = self.shared.writer.lock().await.take();
        if let Some(mut writer) = writer {
            writer.shutdown().await?;
            debug!("Closed NATS connection");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.shared.state.lock().connected
    }

    fn events(&self) -> broadcast::Receiver<TransportEvent> {
        self.shared.events.subscribe()
    }
}
