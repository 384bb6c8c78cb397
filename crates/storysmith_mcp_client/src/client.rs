//! Retrieval tool backed by an MCP server child process.

use crate::{McpServerConfig, McpSession};
use async_trait::async_trait;
use serde_json::json;
use std::process::Stdio;
use std::time::Duration;
use storysmith_error::{ExternalCallError, ExternalCallErrorKind, StorysmithResult};
use storysmith_interface::{RetrievalConnection, RetrievalTool};
use tokio::io::BufReader;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

type StdioSession = McpSession<ChildStdin, BufReader<ChildStdout>>;

#[derive(Debug)]
struct Connection {
    child: Child,
    session: StdioSession,
}

/// Search tool reached through a locally launched MCP server.
///
/// The connection is opened with [`connect`](Self::connect) and must be
/// released with [`close`](Self::close). Calls are serialized over the single
/// stdio channel.
#[derive(Debug)]
pub struct McpRetrievalClient {
    config: McpServerConfig,
    connection: Mutex<Option<Connection>>,
}

impl McpRetrievalClient {
    /// Create a client; nothing is launched until [`connect`](Self::connect).
    pub fn new(config: McpServerConfig) -> Self {
        Self {
            config,
            connection: Mutex::new(None),
        }
    }

    /// Launch settings in use.
    pub fn config(&self) -> &McpServerConfig {
        &self.config
    }

    fn call_timeout(&self) -> Duration {
        Duration::from_secs(*self.config.timeout_seconds())
    }

    /// Launch the server and perform the MCP handshake.
    ///
    /// Connecting an already connected client is a no-op.
    #[instrument(skip(self), fields(command = %self.config.command()))]
    pub async fn connect(&self) -> StorysmithResult<()> {
        let mut guard = self.connection.lock().await;
        if guard.is_some() {
            debug!("Already connected");
            return Ok(());
        }

        let mut cmd = Command::new(self.config.command());
        cmd.args(self.config.args())
            .envs(self.config.env())
            .kill_on_drop(true)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = cmd.spawn().map_err(|e| {
            ExternalCallError::new(ExternalCallErrorKind::Connection(format!(
                "failed to launch '{}': {}",
                self.config.command(),
                e
            )))
        })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(ExternalCallError::new(ExternalCallErrorKind::Connection(
                "server stdio was not captured".to_string(),
            ))
            .into());
        };

        let mut session = McpSession::new(stdin, BufReader::new(stdout));
        timeout(self.call_timeout(), session.initialize())
            .await
            .map_err(|_| {
                ExternalCallError::new(ExternalCallErrorKind::Timeout {
                    operation: "initialize".to_string(),
                    seconds: *self.config.timeout_seconds(),
                })
            })??;

        info!(tool = %self.config.tool(), "Connected to retrieval server");
        *guard = Some(Connection { child, session });
        Ok(())
    }

    /// Whether a server is currently running.
    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    /// Stop the server. Closing a closed client is a no-op.
    #[instrument(skip(self))]
    pub async fn close(&self) -> StorysmithResult<()> {
        let Some(Connection { mut child, session }) = self.connection.lock().await.take() else {
            return Ok(());
        };
        drop(session);

        if let Err(e) = child.kill().await {
            warn!(error = %e, "Failed to stop retrieval server");
            return Err(ExternalCallError::new(ExternalCallErrorKind::Connection(format!(
                "failed to stop server: {}",
                e
            )))
            .into());
        }

        info!("Retrieval server stopped");
        Ok(())
    }
}

#[async_trait]
impl RetrievalConnection for McpRetrievalClient {
    async fn connect(&self) -> StorysmithResult<()> {
        McpRetrievalClient::connect(self).await
    }

    async fn close(&self) -> StorysmithResult<()> {
        McpRetrievalClient::close(self).await
    }
}

#[async_trait]
impl RetrievalTool for McpRetrievalClient {
    #[instrument(skip(self), fields(tool = %self.config.tool()))]
    async fn search(&self, query: &str) -> StorysmithResult<String> {
        let mut guard = self.connection.lock().await;
        let connection = guard.as_mut().ok_or_else(|| {
            ExternalCallError::new(ExternalCallErrorKind::Connection(
                "retrieval client is not connected".to_string(),
            ))
        })?;

        let result = timeout(
            self.call_timeout(),
            connection
                .session
                .call_tool(self.config.tool(), json!({ "query": query })),
        )
        .await
        .map_err(|_| {
            ExternalCallError::new(ExternalCallErrorKind::Timeout {
                operation: format!("tools/call {}", self.config.tool()),
                seconds: *self.config.timeout_seconds(),
            })
        })??;

        serde_json::to_string(&result).map_err(|e| {
            ExternalCallError::new(ExternalCallErrorKind::Protocol(e.to_string())).into()
        })
    }

    fn tool_name(&self) -> &str {
        self.config.tool()
    }
}
