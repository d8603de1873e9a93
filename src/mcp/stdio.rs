//! Line-delimited JSON-RPC over stdin/stdout.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::mcp::rpc::OutboundResponse;
use crate::mcp::service::McpService;

/// Runs against the process stdin/stdout until EOF.
pub async fn serve(service: &McpService) -> std::io::Result<()> {
    log::info!("MCP stdio transport ready");
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    run(service, reader, writer).await
}

/// One response line per request line; notifications produce no output.
/// A line that is not valid UTF-8 gets a parse error like any other bad line.
pub async fn run<R, W>(service: &McpService, mut reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            log::info!("stdin closed, shutting down");
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let message = line.trim();
                if message.is_empty() {
                    continue;
                }
                log::debug!("<- {}", message);
                service.handle_line(message).await
            }
            Err(err) => {
                log::warn!("discarding non UTF-8 input line: {}", err);
                Some(OutboundResponse::parse_error(format!("Parse error: {err}")))
            }
        };

        if let Some(response) = response {
            let encoded = serde_json::to_string(&response)?;
            log::debug!("-> {}", encoded);
            writer.write_all(encoded.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    Ok(())
}
