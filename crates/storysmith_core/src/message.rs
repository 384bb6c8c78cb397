//! Message types sent to the inference backend.

use crate::Role;
use serde::{Deserialize, Serialize};

/// A single text message.
///
/// # Examples
///
/// ```
/// use storysmith_core::{Message, Role};
///
/// let message = Message::user("Write a story about a fox");
/// assert_eq!(message.role, Role::User);
/// assert_eq!(message.content, "Write a story about a fox");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The text of the message
    pub content: String,
}

impl Message {
    /// Create a system (instruction) message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}
