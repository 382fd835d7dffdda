//! Minimal NATS server speaking just enough protocol for the client tests.

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const INFO_LINE: &str =
    "INFO {\"server_id\":\"FAKE\",\"version\":\"2.10.0\",\"max_payload\":1048576}\r\n";

/// Something the client sent us
#[derive(Debug, Clone, PartialEq)]
pub enum ClientFrame {
    Connect(String),
    Publish { subject: String, payload: Vec<u8> },
    Ping,
}

pub struct FakeNatsServer {
    pub url: String,
    pub frames: mpsc::UnboundedReceiver<ClientFrame>,
    /// Each accepted connection's task; abort one to drop that client
    pub connections: mpsc::UnboundedReceiver<JoinHandle<()>>,
    accept_task: JoinHandle<()>,
}

impl FakeNatsServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("nats://{}", listener.local_addr().unwrap());
        let (frames_tx, frames) = mpsc::unbounded_channel();
        let (connections_tx, connections) = mpsc::unbounded_channel();

        let accept_task = tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let frames_tx = frames_tx.clone();
                let handle = tokio::spawn(serve(socket, frames_tx));
                if connections_tx.send(handle).is_err() {
                    break;
                }
            }
        });

        Self {
            url,
            frames,
            connections,
            accept_task,
        }
    }

    /// Next frame other than a PING
    pub async fn next_frame(&mut self) -> ClientFrame {
        loop {
            match self.frames.recv().await.unwrap() {
                ClientFrame::Ping => continue,
                frame => return frame,
            }
        }
    }
}

impl Drop for FakeNatsServer {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

async fn serve(socket: TcpStream, frames: mpsc::UnboundedSender<ClientFrame>) {
    let (read_half, mut writer) = socket.into_split();
    let mut reader = BufReader::new(read_half);
    if writer.write_all(INFO_LINE.as_bytes()).await.is_err() {
        return;
    }

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let line = line.trim_end().to_string();

        if let Some(json) = line.strip_prefix("CONNECT ") {
            let _ = frames.send(ClientFrame::Connect(json.to_string()));
        } else if line == "PING" {
            let _ = frames.send(ClientFrame::Ping);
            if writer.write_all(b"PONG\r\n").await.is_err() {
                return;
            }
        } else if let Some(rest) = line.strip_prefix("PUB ") {
            let mut parts = rest.split_whitespace();
            let subject = parts.next().unwrap_or_default().to_string();
            let len: usize = parts.last().and_then(|n| n.parse().ok()).unwrap_or(0);
            let mut payload = vec![0u8; len + 2];
            if reader.read_exact(&mut payload).await.is_err() {
                return;
            }
            payload.truncate(len);
            let _ = frames.send(ClientFrame::Publish { subject, payload });
        }
    }
}
