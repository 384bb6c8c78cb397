//! Inference and retrieval collaborator traits.

use async_trait::async_trait;
use storysmith_core::{GenerateRequest, GenerateResponse};
use storysmith_error::StorysmithResult;
use std::sync::Arc;

/// Core trait every inference backend implements.
///
/// Backends may return free text that ignores any format the instructions
/// asked for; callers must validate the output themselves.
#[async_trait]
pub trait InferenceDriver: Send + Sync {
    /// Generate text for a request.
    async fn generate(&self, req: &GenerateRequest) -> StorysmithResult<GenerateResponse>;

    /// Provider name (e.g., "ollama").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier, used when a request does not name one.
    fn model_name(&self) -> &str;
}

/// A search tool reached over a long-lived connection.
///
/// `search` returns the tool's response document as JSON text. Decoding its
/// shape is the caller's job.
#[async_trait]
pub trait RetrievalTool: Send + Sync {
    /// Run one search.
    async fn search(&self, query: &str) -> StorysmithResult<String>;

    /// Name of the tool being invoked.
    fn tool_name(&self) -> &str;
}

/// A collaborator holding an external resource that is opened once per run
/// and released afterwards.
#[async_trait]
pub trait RetrievalConnection: Send + Sync {
    /// Open the connection. Opening an open connection is a no-op.
    async fn connect(&self) -> StorysmithResult<()>;

    /// Release the connection. Closing a closed connection is a no-op.
    async fn close(&self) -> StorysmithResult<()>;
}

#[async_trait]
impl<T: InferenceDriver + ?Sized> InferenceDriver for Arc<T> {
    async fn generate(&self, req: &GenerateRequest) -> StorysmithResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<'a, T: InferenceDriver + ?Sized> InferenceDriver for &'a T {
    async fn generate(&self, req: &GenerateRequest) -> StorysmithResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<T: RetrievalTool + ?Sized> RetrievalTool for Arc<T> {
    async fn search(&self, query: &str) -> StorysmithResult<String> {
        (**self).search(query).await
    }

    fn tool_name(&self) -> &str {
        (**self).tool_name()
    }
}
