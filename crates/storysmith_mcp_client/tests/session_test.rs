//! MCP session tests against an in-process fake server.

use serde_json::{Value, json};
use std::sync::Arc;
use storysmith_error::{ExternalCallErrorKind, StorysmithError, StorysmithErrorKind};
use storysmith_interface::RetrievalTool;
use storysmith_mcp_client::{McpRetrievalClient, McpServerConfig, McpSession};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, duplex};
use tokio::sync::Mutex;

type Received = Arc<Mutex<Vec<String>>>;

/// Answers `initialize` and `tools/call` the way mcp-local-rag does, with some
/// noise mixed into the stream.
async fn fake_server(input: DuplexStream, mut output: DuplexStream, received: Received) {
    let mut lines = BufReader::new(input).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let message: Value = serde_json::from_str(&line).unwrap();
        let method = message["method"].as_str().unwrap_or_default().to_string();
        received.lock().await.push(method.clone());

        let Some(id) = message.get("id").cloned() else {
            continue;
        };

        let reply = match method.as_str() {
            "initialize" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {"tools": {}},
                    "serverInfo": {"name": "fake-rag", "version": "0.0.1"}
                }
            }),
            "tools/call" => {
                let query = message["params"]["arguments"]["query"]
                    .as_str()
                    .unwrap_or_default();
                // Noise the client has to skip
                output
                    .write_all(b"{\"jsonrpc\":\"2.0\",\"method\":\"notifications/progress\"}\nplain log line\n")
                    .await
                    .unwrap();
                match query {
                    "rpc-failure" => json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "error": {"code": -32602, "message": "bad arguments"}
                    }),
                    "tool-failure" => json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "result": {
                            "content": [{"type": "text", "text": "search backend down"}],
                            "isError": true
                        }
                    }),
                    _ => {
                        let inner = json!({
                            "content": [{"type": "text", "text": format!("facts about {query}"), "url": "https://example.org"}]
                        });
                        json!({
                            "jsonrpc": "2.0",
                            "id": id,
                            "result": {
                                "content": [{"type": "text", "text": inner.to_string()}],
                                "isError": false
                            }
                        })
                    }
                }
            }
            _ => json!({"jsonrpc": "2.0", "id": id, "error": {"code": -32601, "message": "unknown"}}),
        };

        let mut text = reply.to_string();
        text.push('\n');
        if output.write_all(text.as_bytes()).await.is_err() {
            break;
        }
    }
}

fn start() -> (
    McpSession<DuplexStream, BufReader<DuplexStream>>,
    Received,
) {
    let (client_out, server_in) = duplex(64 * 1024);
    let (server_out, client_in) = duplex(64 * 1024);
    let received = Received::default();
    tokio::spawn(fake_server(server_in, server_out, received.clone()));
    (McpSession::new(client_out, BufReader::new(client_in)), received)
}

fn external_kind(err: &StorysmithError) -> &ExternalCallErrorKind {
    match err.kind() {
        StorysmithErrorKind::ExternalCall(e) => &e.kind,
        other => panic!("expected external call error, got {other}"),
    }
}

#[tokio::test]
async fn test_handshake_sends_initialized_notification() {
    let (mut session, received) = start();

    let result = session.initialize().await.unwrap();
    assert_eq!(result["serverInfo"]["name"], "fake-rag");

    // Round-trip another request so the notification has certainly arrived
    session.call_tool("rag_search", json!({"query": "owls"})).await.unwrap();

    let methods = received.lock().await.clone();
    assert_eq!(
        methods,
        vec!["initialize", "notifications/initialized", "tools/call"]
    );
}

#[tokio::test]
async fn test_call_tool_returns_result_document() {
    let (mut session, _) = start();
    session.initialize().await.unwrap();

    let result = session
        .call_tool("rag_search", json!({"query": "owls"}))
        .await
        .unwrap();

    let inner_text = result["content"][0]["text"].as_str().unwrap();
    let inner: Value = serde_json::from_str(inner_text).unwrap();
    assert_eq!(inner["content"][0]["text"], "facts about owls");
    assert_eq!(inner["content"][0]["url"], "https://example.org");
}

#[tokio::test]
async fn test_consecutive_calls_match_their_ids() {
    let (mut session, _) = start();
    session.initialize().await.unwrap();

    for query in ["foxes", "rabbits", "sharing"] {
        let result = session
            .call_tool("rag_search", json!({"query": query}))
            .await
            .unwrap();
        let inner: Value =
            serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(inner["content"][0]["text"], format!("facts about {query}"));
    }
}

#[tokio::test]
async fn test_tool_error_result_is_retrieval_failure() {
    let (mut session, _) = start();
    session.initialize().await.unwrap();

    let err = session
        .call_tool("rag_search", json!({"query": "tool-failure"}))
        .await
        .unwrap_err();

    assert_eq!(
        external_kind(&err),
        &ExternalCallErrorKind::Retrieval("search backend down".to_string())
    );
}

#[tokio::test]
async fn test_json_rpc_error_is_protocol_failure() {
    let (mut session, _) = start();
    session.initialize().await.unwrap();

    let err = session
        .call_tool("rag_search", json!({"query": "rpc-failure"}))
        .await
        .unwrap_err();

    match external_kind(&err) {
        ExternalCallErrorKind::Protocol(message) => assert!(message.contains("bad arguments")),
        other => panic!("unexpected kind {other}"),
    }
}

#[tokio::test]
async fn test_closed_stream_is_connection_failure() {
    let (client_out, _server_in) = duplex(1024);
    let (server_out, client_in) = duplex(1024);
    drop(server_out);

    let mut session = McpSession::new(client_out, BufReader::new(client_in));
    let err = session.initialize().await.unwrap_err();
    assert!(matches!(
        external_kind(&err),
        ExternalCallErrorKind::Connection(_)
    ));
}

#[tokio::test]
async fn test_search_before_connect_fails() {
    let client = McpRetrievalClient::new(McpServerConfig::new("true", Vec::<String>::new()));
    assert!(!client.is_connected().await);

    let err = client.search("owls").await.unwrap_err();
    assert!(matches!(
        external_kind(&err),
        ExternalCallErrorKind::Connection(_)
    ));
}

#[tokio::test]
async fn test_connect_missing_command_fails() {
    let client = McpRetrievalClient::new(McpServerConfig::new(
        "storysmith-definitely-not-a-real-binary",
        Vec::<String>::new(),
    ));

    let err = client.connect().await.unwrap_err();
    assert!(matches!(
        external_kind(&err),
        ExternalCallErrorKind::Connection(_)
    ));
    assert!(!client.is_connected().await);
    client.close().await.unwrap();
}
