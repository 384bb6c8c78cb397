//! Request and response types for model inference.

use crate::Message;
use serde::{Deserialize, Serialize};

/// Generation request handed to an inference backend.
///
/// # Examples
///
/// ```
/// use storysmith_core::{GenerateRequest, Message};
///
/// let request = GenerateRequest::new(vec![
///     Message::system("You write children's stories."),
///     Message::user("A fox learns to share."),
/// ])
/// .with_model("llama3");
///
/// assert_eq!(request.messages.len(), 2);
/// assert_eq!(request.model.as_deref(), Some("llama3"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The conversation messages to send
    pub messages: Vec<Message>,
    /// Model identifier to use (backend default when `None`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl GenerateRequest {
    /// Request for the backend's default model.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            model: None,
        }
    }

    /// Name the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Text returned by an inference backend.
///
/// # Examples
///
/// ```
/// use storysmith_core::GenerateResponse;
///
/// let response = GenerateResponse::new("Once upon a time");
/// assert_eq!(response.text, "Once upon a time");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated text, unmodified
    pub text: String,
}

impl GenerateResponse {
    /// Wrap generated text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
