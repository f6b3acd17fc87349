use crate::gateway::RequestGateway;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Answers newline-delimited JSON lookup requests until `input` closes.
///
/// Each request runs as its own task against the shared gateway, so responses
/// are written in completion order, one JSON object per line.
pub async fn serve<R, W>(gateway: Arc<RequestGateway>, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let mut lines = input.lines();

    let read_loop = async move {
        while let Some(line) = lines.next_line().await.context("Failed to read request")? {
            if line.trim().is_empty() {
                continue;
            }
            debug!(request = %line, "Received request");

            let gateway = Arc::clone(&gateway);
            let tx = tx.clone();
            tokio::spawn(async move {
                let response = gateway.handle_message(&line).await;
                match serde_json::to_string(&response) {
                    Ok(encoded) => {
                        let _ = tx.send(encoded);
                    }
                    Err(e) => tracing::error!(error = %e, "Failed to encode response"),
                }
            });
        }
        info!("Input closed, waiting for in-flight lookups");
        Ok::<_, anyhow::Error>(())
    };

    let write_loop = async {
        while let Some(encoded) = rx.recv().await {
            output.write_all(encoded.as_bytes()).await?;
            output.write_all(b"\n").await?;
            output.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    };

    let (read_result, write_result) = tokio::join!(read_loop, write_loop);
    read_result?;
    write_result.context("Failed to write response")?;
    Ok(())
}
