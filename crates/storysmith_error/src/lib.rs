//! Error types for Storysmith.
//!
//! Every crate in the workspace reports failures through the types defined here.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! The pipeline distinguishes three families of attempt failures:
//!
//! - [`ParseError`]: a model produced text that is not the JSON shape we asked for.
//!   Recoverable when it happens on the final story, fatal on query generation.
//! - [`ToolResponseShapeError`]: the retrieval tool answered with an unexpected shape.
//! - [`ExternalCallError`]: the inference backend or retrieval tool could not be reached.
//!
//! # Examples
//!
//! ```
//! use storysmith_error::{ExternalCallError, ExternalCallErrorKind, StorysmithResult};
//!
//! fn search() -> StorysmithResult<String> {
//!     Err(ExternalCallError::new(ExternalCallErrorKind::Retrieval(
//!         "connection refused".to_string(),
//!     )))?
//! }
//!
//! assert!(search().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod external_call;
mod parse;
mod storage;
mod tool_response;

pub use config::ConfigError;
pub use error::{StorysmithError, StorysmithErrorKind, StorysmithResult};
pub use external_call::{ExternalCallError, ExternalCallErrorKind};
pub use parse::{ParseError, ParseErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use tool_response::{ToolResponseShapeError, ToolResponseShapeErrorKind};
