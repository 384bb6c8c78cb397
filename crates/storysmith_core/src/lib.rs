//! Core data types for Storysmith.
//!
//! Two groups of types live here:
//!
//! - the generic request/response types exchanged with an inference backend
//!   ([`GenerateRequest`], [`Message`], [`Role`]), and
//! - the story domain model flowing through the pipeline, from a
//!   [`GenerationRequest`] to the [`PersistedRecord`] written to disk.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod generation;
mod message;
mod record;
mod request;
mod retrieval;
mod role;
mod story;

pub use generation::GenerationRequest;
pub use message::Message;
pub use record::{FallbackRecord, PersistedRecord};
pub use request::{GenerateRequest, GenerateResponse};
pub use retrieval::{RetrievalResult, Snippet};
pub use role::Role;
pub use story::{SearchQuerySet, StoryIdea, StoryRecord};
