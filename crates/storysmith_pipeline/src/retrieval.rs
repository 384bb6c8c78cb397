//! Decoding of retrieval tool responses into bounded snippets.

use serde::Deserialize;
use serde_json::Value;
use storysmith_core::{RetrievalResult, Snippet};
use storysmith_error::{StorysmithResult, ToolResponseShapeError, ToolResponseShapeErrorKind};
use storysmith_interface::RetrievalTool;
use tracing::{debug, instrument};

/// Number of generated queries actually sent to the retrieval tool.
pub const MAX_QUERIES_PER_ATTEMPT: usize = 2;

/// Snippet text is cut to this many characters.
pub const SNIPPET_CHAR_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
struct InnerPayload {
    content: Vec<InnerItem>,
}

#[derive(Debug, Deserialize)]
struct InnerItem {
    text: String,
    url: String,
}

/// First `limit` characters of `text`, never splitting a character.
///
/// # Examples
///
/// ```
/// use storysmith_pipeline::truncate_chars;
///
/// assert_eq!(truncate_chars("héllo", 2), "hé");
/// assert_eq!(truncate_chars("short", 500), "short");
/// ```
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Decode a tool response into snippets.
///
/// The expected document is an object whose `content` array starts with an
/// element carrying a `text` string; that string is itself JSON holding a
/// `content` list of `{text, url}` items. Snippet text is truncated to
/// [`SNIPPET_CHAR_LIMIT`] characters.
///
/// # Examples
///
/// ```
/// use storysmith_pipeline::decode_tool_response;
///
/// let inner = r#"{"content": [{"text": "Foxes live in dens.", "url": "https://example.org/fox"}]}"#;
/// let outer = serde_json::json!({"content": [{"type": "text", "text": inner}]}).to_string();
///
/// let snippets = decode_tool_response(&outer).unwrap();
/// assert_eq!(snippets[0].source, "https://example.org/fox");
/// ```
pub fn decode_tool_response(raw: &str) -> Result<Vec<Snippet>, ToolResponseShapeError> {
    let outer: Value = serde_json::from_str(raw).map_err(|e| {
        ToolResponseShapeError::new(ToolResponseShapeErrorKind::OuterNotJson(e.to_string()))
    })?;

    let first = outer
        .get("content")
        .and_then(Value::as_array)
        .and_then(|content| content.first())
        .ok_or_else(|| ToolResponseShapeError::new(ToolResponseShapeErrorKind::MissingContent))?;

    let embedded = first
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| ToolResponseShapeError::new(ToolResponseShapeErrorKind::MissingText))?;

    let inner: Value = serde_json::from_str(embedded).map_err(|e| {
        ToolResponseShapeError::new(ToolResponseShapeErrorKind::InnerNotJson(e.to_string()))
    })?;

    let payload: InnerPayload = serde_json::from_value(inner).map_err(|e| {
        ToolResponseShapeError::new(ToolResponseShapeErrorKind::InnerShape(e.to_string()))
    })?;

    Ok(payload
        .content
        .into_iter()
        .map(|item| Snippet {
            text: truncate_chars(&item.text, SNIPPET_CHAR_LIMIT).to_string(),
            source: item.url,
        })
        .collect())
}

/// Runs queries against a retrieval tool and normalizes the answers.
#[derive(Debug)]
pub struct RetrievalAdapter<'a, R: ?Sized> {
    tool: &'a R,
}

impl<'a, R: RetrievalTool + ?Sized> RetrievalAdapter<'a, R> {
    /// Wrap a connected retrieval tool.
    pub fn new(tool: &'a R) -> Self {
        Self { tool }
    }

    /// Search for one query.
    ///
    /// # Errors
    ///
    /// Transport failures from the tool, or a tool response shape error.
    #[instrument(skip(self), fields(tool = %self.tool.tool_name()))]
    pub async fn retrieve(&self, query: &str) -> StorysmithResult<RetrievalResult> {
        let raw = self.tool.search(query).await?;
        let snippets = decode_tool_response(&raw)?;
        debug!(snippets = snippets.len(), "Retrieved snippets");
        Ok(RetrievalResult::new(query, snippets))
    }
}
