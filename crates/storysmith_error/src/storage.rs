//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create an output directory
    #[display("Failed to create directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write a record file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to serialize a record
    #[display("Failed to serialize record: {}", _0)]
    Serialization(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use storysmith_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::FileWrite("output/a.json".to_string()));
/// assert!(format!("{}", err).contains("output/a.json"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
