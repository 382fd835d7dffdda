//! Newline-delimited JSON over a reader/writer pair: one `ToolRequest`
//! per input line, one `ToolResponse` per output line.

use std::io;

use log::{debug, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use vs_stream::StopGuard;
use vs_tools::{ToolDispatcher, ToolError, ToolRequest, ToolResponse};

/// Serve requests until the input ends or `stop` fires.
/// Returns the number of requests answered.
pub async fn serve<R, W>(
    dispatcher: &ToolDispatcher,
    reader: R,
    mut writer: W,
    mut stop: StopGuard,
) -> io::Result<u64>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut answered = 0;

    loop {
        let line = tokio::select! {
            _ = stop.wait() => {
                info!("Tool loop stopping on shutdown signal");
                break;
            }
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            info!("Tool input closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ToolRequest>(&line) {
            Ok(request) => dispatcher.dispatch(request).await,
            Err(e) => {
                debug!("Unparseable tool request: {}", e);
                ToolResponse::failure(None, &ToolError::from(e))
            }
        };

        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
        answered += 1;
    }

    Ok(answered)
}
