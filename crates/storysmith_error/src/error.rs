//! Top-level error wrapper types.

use crate::{
    ConfigError, ExternalCallError, ParseError, StorageError, ToolResponseShapeError,
};

/// Every failure a Storysmith operation can report.
///
/// # Examples
///
/// ```
/// use storysmith_error::{ConfigError, StorysmithError};
///
/// let err: StorysmithError = ConfigError::new("missing [models] section").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StorysmithErrorKind {
    /// Model output could not be decoded into the expected structure
    #[from(ParseError)]
    Parse(ParseError),
    /// Retrieval tool answered with an unexpected response shape
    #[from(ToolResponseShapeError)]
    ToolResponseShape(ToolResponseShapeError),
    /// Inference or retrieval transport failure
    #[from(ExternalCallError)]
    ExternalCall(ExternalCallError),
    /// Persistence failure
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Storysmith error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storysmith_error::{StorysmithErrorKind, StorysmithResult, StorageError, StorageErrorKind};
///
/// fn write() -> StorysmithResult<()> {
///     Err(StorageError::new(StorageErrorKind::FileWrite("disk full".to_string())))?
/// }
///
/// let err = write().unwrap_err();
/// assert!(matches!(err.kind(), StorysmithErrorKind::Storage(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storysmith Error: {}", _0)]
pub struct StorysmithError(Box<StorysmithErrorKind>);

impl StorysmithError {
    /// Create a new error from a kind.
    pub fn new(kind: StorysmithErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StorysmithErrorKind {
        &self.0
    }

    /// Whether this error is a parse failure of model output.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self.kind(), StorysmithErrorKind::Parse(_))
    }
}

// Generic From implementation for any type that converts to StorysmithErrorKind
impl<T> From<T> for StorysmithError
where
    T: Into<StorysmithErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storysmith operations.
pub type StorysmithResult<T> = std::result::Result<T, StorysmithError>;
