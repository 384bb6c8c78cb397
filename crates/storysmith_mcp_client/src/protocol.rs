//! JSON-RPC 2.0 message shapes used by MCP.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MCP protocol revision sent during the handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Outgoing request.
#[derive(Debug, Serialize)]
pub(crate) struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> JsonRpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

/// Outgoing notification (no id, no reply).
#[derive(Debug, Serialize)]
pub(crate) struct JsonRpcNotification<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl<'a> JsonRpcNotification<'a> {
    pub fn new(method: &'a str, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
        }
    }
}

/// Any incoming line: a response, a notification, or a server request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcMessage {
    /// Request id, absent on notifications
    #[serde(default)]
    pub id: Option<Value>,
    /// Method name, present on notifications and server requests
    #[serde(default)]
    pub method: Option<String>,
    /// Success payload
    #[serde(default)]
    pub result: Option<Value>,
    /// Failure payload
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

impl JsonRpcMessage {
    /// Whether this is the response to request `id`.
    pub fn answers(&self, id: u64) -> bool {
        self.method.is_none() && self.id.as_ref().and_then(Value::as_u64) == Some(id)
    }
}

/// JSON-RPC error member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JsonRpcErrorObject {
    /// Error code
    pub code: i64,
    /// Human-readable message
    pub message: String,
}
