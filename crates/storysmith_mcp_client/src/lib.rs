//! MCP client for the Storysmith retrieval tool.
//!
//! The search tool is an MCP server launched as a child process and spoken to
//! over newline-delimited JSON-RPC on its stdin and stdout. [`McpSession`]
//! handles the wire protocol over any pair of async streams;
//! [`McpRetrievalClient`] owns the child process and implements
//! [`storysmith_interface::RetrievalTool`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod protocol;
mod session;

pub use client::McpRetrievalClient;
pub use config::McpServerConfig;
pub use protocol::{JsonRpcErrorObject, JsonRpcMessage, PROTOCOL_VERSION};
pub use session::McpSession;
