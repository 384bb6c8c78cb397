//! Failures talking to the inference backend or the retrieval tool.

/// Specific external call failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ExternalCallErrorKind {
    /// Inference backend returned an error
    #[display("Inference failed: {}", _0)]
    Inference(String),
    /// Inference server is not reachable
    #[display("Inference server not running at {}", _0)]
    ServerNotRunning(String),
    /// Requested model is not available on the inference server
    #[display("Model not found: {}", _0)]
    ModelNotFound(String),
    /// Retrieval tool call failed or reported an error result
    #[display("Retrieval failed: {}", _0)]
    Retrieval(String),
    /// Could not start or talk to the retrieval tool process
    #[display("Connection error: {}", _0)]
    Connection(String),
    /// Retrieval tool violated the JSON-RPC protocol
    #[display("Protocol error: {}", _0)]
    Protocol(String),
    /// A call exceeded its configured time bound
    #[display("Timed out after {} seconds: {}", seconds, operation)]
    Timeout {
        /// What was being awaited
        operation: String,
        /// Configured bound
        seconds: u64,
    },
}

/// External collaborator failure with location tracking.
///
/// # Examples
///
/// ```
/// use storysmith_error::{ExternalCallError, ExternalCallErrorKind};
///
/// let err = ExternalCallError::new(ExternalCallErrorKind::ModelNotFound("llama3".to_string()));
/// assert!(format!("{}", err).contains("llama3"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("External Call Error: {} at line {} in {}", kind, line, file)]
pub struct ExternalCallError {
    /// The specific failure
    pub kind: ExternalCallErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ExternalCallError {
    /// Create a new ExternalCallError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExternalCallErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
