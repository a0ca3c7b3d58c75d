// SPDX-License-Identifier: MIT OR Apache-2.0
//! The serve loop: read frames, dispatch to a [`ToolHandler`], write replies.

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, warn};

use crate::codec::JsonlCodec;
use crate::error::{ProtocolError, ToolError};
use crate::frame::{Frame, ToolSpec};

/// A tool server's behavior: its advertised tools and their call logic.
#[async_trait]
pub trait ToolHandler {
    /// The tools this server exposes.
    fn tools(&self) -> Vec<ToolSpec>;

    /// Handle one `call` frame.
    async fn call(
        &mut self,
        tool: &str,
        arguments: Value,
    ) -> Result<crate::frame::ToolOutput, ToolError>;
}

/// Run a handler over the process's stdin/stdout until EOF.
pub async fn serve_stdio<H: ToolHandler + Send>(handler: &mut H) -> Result<(), ProtocolError> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve(handler, stdin, stdout).await
}

/// Run a handler over arbitrary async streams until EOF.
///
/// Malformed request lines produce a `fatal` frame without a `ref_id` and end
/// the loop, as does a [`ToolError::Internal`] from the handler. Per-call
/// failures (`InvalidParams`, `UnknownTool`) are reported as error `result`
/// frames and the loop keeps going.
pub async fn serve<H, R, W>(handler: &mut H, reader: R, mut writer: W) -> Result<(), ProtocolError>
where
    H: ToolHandler + Send,
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.map_err(ProtocolError::Read)? {
        if line.trim().is_empty() {
            continue;
        }
        let frame = match JsonlCodec::decode(&line) {
            Ok(frame) => frame,
            Err(err) => {
                error!(target: "mlp.protocol", "malformed request: {err}");
                let fatal = Frame::Fatal {
                    ref_id: None,
                    error: err.to_string(),
                };
                write_frame(&mut writer, &fatal).await?;
                return Err(err);
            }
        };
        let reply = match frame {
            Frame::ListTools { id } => {
                debug!(target: "mlp.protocol", "list_tools id={id}");
                Frame::Tools {
                    ref_id: id,
                    tools: handler.tools(),
                }
            }
            Frame::Call {
                id,
                tool,
                arguments,
            } => {
                debug!(target: "mlp.protocol", "call id={id} tool={tool}");
                match handler.call(&tool, arguments).await {
                    Ok(output) => Frame::Result {
                        ref_id: id,
                        content: output.content,
                        is_error: false,
                        metadata: output.metadata,
                    },
                    Err(err @ (ToolError::InvalidParams(_) | ToolError::UnknownTool(_))) => {
                        warn!(target: "mlp.protocol", "call {tool} failed: {err}");
                        Frame::Result {
                            ref_id: id,
                            content: err.to_string(),
                            is_error: true,
                            metadata: Value::Null,
                        }
                    }
                    Err(err @ ToolError::Internal(_)) => {
                        error!(target: "mlp.protocol", "call {tool} failed fatally: {err}");
                        let fatal = Frame::Fatal {
                            ref_id: Some(id),
                            error: err.to_string(),
                        };
                        write_frame(&mut writer, &fatal).await?;
                        return Ok(());
                    }
                }
            }
            // Response frames arriving on the request side are a client bug;
            // skip them rather than tearing down the server.
            other => {
                warn!(target: "mlp.protocol", "ignoring non-request frame: {other:?}");
                continue;
            }
        };
        write_frame(&mut writer, &reply).await?;
    }
    Ok(())
}

async fn write_frame<W>(writer: &mut W, frame: &Frame) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin + Send,
{
    let line = JsonlCodec::encode(frame)?;
    writer
        .write_all(line.as_bytes())
        .await
        .map_err(ProtocolError::Write)?;
    writer.flush().await.map_err(ProtocolError::Write)
}
