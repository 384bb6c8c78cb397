//! Parse failures of model output.

/// Why a model response could not be turned into structured data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ParseErrorKind {
    /// Nothing but whitespace was left after fence stripping
    #[display("No JSON content in response")]
    Empty,
    /// The candidate text is not valid JSON
    #[display("Invalid JSON: {}", _0)]
    InvalidJson(String),
    /// Valid JSON, but a required key is missing or has the wrong type
    #[display("Unexpected JSON shape: {}", _0)]
    UnexpectedShape(String),
}

/// A model response that failed structured extraction.
///
/// The raw response is kept verbatim so callers can fall back to persisting it.
///
/// # Examples
///
/// ```
/// use storysmith_error::{ParseError, ParseErrorKind};
///
/// let err = ParseError::new(ParseErrorKind::Empty, "```json\n```");
/// assert_eq!(err.raw, "```json\n```");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Parse Error: {} ({} chars of raw output) at line {} in {}",
    kind,
    raw.len(),
    line,
    file
)]
pub struct ParseError {
    /// The specific failure
    pub kind: ParseErrorKind,
    /// The complete, unmodified model response
    pub raw: String,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ParseError {
    /// Create a new ParseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ParseErrorKind, raw: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            raw: raw.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Consume the error, returning the raw model output.
    pub fn into_raw(self) -> String {
        self.raw
    }
}
