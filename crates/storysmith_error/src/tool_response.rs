//! Retrieval tool response shape errors.

/// Ways a retrieval tool response can deviate from the expected nesting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ToolResponseShapeErrorKind {
    /// The outer response is not a JSON document
    #[display("Outer response is not JSON: {}", _0)]
    OuterNotJson(String),
    /// The outer `content` array is missing or empty
    #[display("Missing outer content array")]
    MissingContent,
    /// The first content element has no string `text` field
    #[display("First content element has no text field")]
    MissingText,
    /// The embedded `text` field is not a JSON document
    #[display("Embedded payload is not JSON: {}", _0)]
    InnerNotJson(String),
    /// The embedded payload has no `content` list of `{text, url}` items
    #[display("Embedded payload has unexpected shape: {}", _0)]
    InnerShape(String),
}

/// Retrieval tool response did not match the nested shape the adapter decodes.
///
/// # Examples
///
/// ```
/// use storysmith_error::{ToolResponseShapeError, ToolResponseShapeErrorKind};
///
/// let err = ToolResponseShapeError::new(ToolResponseShapeErrorKind::MissingContent);
/// assert!(format!("{}", err).contains("content"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Tool Response Error: {} at line {} in {}", kind, line, file)]
pub struct ToolResponseShapeError {
    /// The specific mismatch
    pub kind: ToolResponseShapeErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ToolResponseShapeError {
    /// Create a new ToolResponseShapeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ToolResponseShapeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
