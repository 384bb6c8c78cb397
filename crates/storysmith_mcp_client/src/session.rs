//! Newline-delimited JSON-RPC session over a pair of async streams.

use crate::protocol::{JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, PROTOCOL_VERSION};
use serde_json::{Value, json};
use storysmith_error::{ExternalCallError, ExternalCallErrorKind, StorysmithResult};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument, trace};

/// One MCP conversation.
///
/// Requests are answered strictly in turn: [`McpSession::request`] reads lines
/// until the response with its id arrives, skipping notifications, server
/// requests, stale responses and non-JSON noise.
#[derive(Debug)]
pub struct McpSession<W, R> {
    writer: W,
    reader: R,
    next_id: u64,
}

impl<W, R> McpSession<W, R>
where
    W: AsyncWrite + Unpin + Send,
    R: AsyncBufRead + Unpin + Send,
{
    /// Wrap the server's input and output streams.
    pub fn new(writer: W, reader: R) -> Self {
        Self {
            writer,
            reader,
            next_id: 0,
        }
    }

    /// Perform the `initialize` handshake and acknowledge it.
    ///
    /// Returns the server's `initialize` result.
    #[instrument(skip(self))]
    pub async fn initialize(&mut self) -> StorysmithResult<Value> {
        let result = self
            .request(
                "initialize",
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": {
                        "name": "storysmith",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            )
            .await?;
        self.notify("notifications/initialized", None).await?;
        debug!(
            server = ?result.get("serverInfo"),
            "MCP handshake complete"
        );
        Ok(result)
    }

    /// Invoke a tool and return its `CallToolResult` document.
    ///
    /// A result flagged `isError` becomes a retrieval error carrying the
    /// tool's text.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> StorysmithResult<Value> {
        let result = self
            .request("tools/call", json!({ "name": name, "arguments": arguments }))
            .await?;

        if result.get("isError").and_then(Value::as_bool) == Some(true) {
            let message = result
                .pointer("/content/0/text")
                .and_then(Value::as_str)
                .unwrap_or("tool reported an error")
                .to_string();
            return Err(ExternalCallError::new(ExternalCallErrorKind::Retrieval(message)).into());
        }

        Ok(result)
    }

    /// Send a request and wait for its result.
    pub async fn request(&mut self, method: &str, params: Value) -> StorysmithResult<Value> {
        self.next_id += 1;
        let id = self.next_id;

        let line = serde_json::to_string(&JsonRpcRequest::new(id, method, params))
            .map_err(|e| protocol_error(format!("cannot encode {}: {}", method, e)))?;
        self.send_line(&line).await?;

        loop {
            let message = self.read_message().await?;
            if !message.answers(id) {
                trace!(method = ?message.method, id = ?message.id, "Skipping unrelated message");
                continue;
            }

            if let Some(error) = message.error {
                return Err(protocol_error(format!(
                    "{} failed with code {}: {}",
                    method, error.code, error.message
                )));
            }

            return message
                .result
                .ok_or_else(|| protocol_error(format!("{} response has no result", method)));
        }
    }

    /// Send a notification.
    pub async fn notify(&mut self, method: &str, params: Option<Value>) -> StorysmithResult<()> {
        let line = serde_json::to_string(&JsonRpcNotification::new(method, params))
            .map_err(|e| protocol_error(format!("cannot encode {}: {}", method, e)))?;
        self.send_line(&line).await
    }

    async fn send_line(&mut self, line: &str) -> StorysmithResult<()> {
        trace!(line, "Sending");
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(connection_error)?;
        self.writer.write_all(b"\n").await.map_err(connection_error)?;
        self.writer.flush().await.map_err(connection_error)?;
        Ok(())
    }

    async fn read_message(&mut self) -> StorysmithResult<JsonRpcMessage> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .reader
                .read_line(&mut line)
                .await
                .map_err(connection_error)?;
            if read == 0 {
                return Err(ExternalCallError::new(ExternalCallErrorKind::Connection(
                    "server closed its output".to_string(),
                ))
                .into());
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<JsonRpcMessage>(trimmed) {
                Ok(message) => return Ok(message),
                Err(e) => debug!(error = %e, "Ignoring non-JSON-RPC output line"),
            }
        }
    }
}

fn protocol_error(message: String) -> storysmith_error::StorysmithError {
    ExternalCallError::new(ExternalCallErrorKind::Protocol(message)).into()
}

fn connection_error(e: std::io::Error) -> storysmith_error::StorysmithError {
    ExternalCallError::new(ExternalCallErrorKind::Connection(e.to_string())).into()
}
