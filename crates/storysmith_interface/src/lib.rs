//! Trait definitions for the collaborators the Storysmith pipeline depends on.
//!
//! The pipeline never talks to a concrete model server or search tool; it is
//! generic over these traits so backends can be swapped and mocked.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{InferenceDriver, RetrievalConnection, RetrievalTool};
