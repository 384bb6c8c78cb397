//! Launch settings for the retrieval MCP server.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_tool() -> String {
    "rag_search".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

/// How to start the MCP server and which tool to call on it.
///
/// # Examples
///
/// ```
/// use storysmith_mcp_client::McpServerConfig;
///
/// let config = McpServerConfig::new("uvx", ["mcp-local-rag"]);
/// assert_eq!(config.tool(), "rag_search");
/// assert_eq!(*config.timeout_seconds(), 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct McpServerConfig {
    /// Executable to launch
    command: String,
    /// Arguments passed to the executable
    #[serde(default)]
    args: Vec<String>,
    /// Extra environment variables for the child process
    #[serde(default)]
    env: HashMap<String, String>,
    /// Name of the search tool exposed by the server
    #[serde(default = "default_tool")]
    tool: String,
    /// Bound on the handshake and on each tool call
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
}

impl McpServerConfig {
    /// Config with default tool name and timeout.
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            env: HashMap::new(),
            tool: default_tool(),
            timeout_seconds: default_timeout_seconds(),
        }
    }

    /// Override the tool name.
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    /// Override the call timeout.
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Add an environment variable for the child process.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: McpServerConfig =
            serde_json::from_str(r#"{"command": "uvx", "args": ["mcp-local-rag"]}"#).unwrap();
        assert_eq!(config.command(), "uvx");
        assert_eq!(config.args(), &vec!["mcp-local-rag".to_string()]);
        assert!(config.env().is_empty());
        assert_eq!(config.tool(), "rag_search");
        assert_eq!(*config.timeout_seconds(), 60);
    }

    #[test]
    fn test_builder_style_overrides() {
        let config = McpServerConfig::new("python", Vec::<String>::new())
            .with_tool("web_search")
            .with_timeout_seconds(5)
            .with_env("RAG_DIR", "/tmp/rag");
        assert_eq!(config.tool(), "web_search");
        assert_eq!(*config.timeout_seconds(), 5);
        assert_eq!(config.env().get("RAG_DIR").map(String::as_str), Some("/tmp/rag"));
    }
}
