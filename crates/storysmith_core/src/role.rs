//! Message authorship.

use serde::{Deserialize, Serialize};

/// Who a message sent to a model speaks as.
///
/// Stage agents only ever send one `System` and one `User` message.
/// `Display` gives the label used when a conversation is flattened into a
/// single prompt.
///
/// ```
/// use storysmith_core::Role;
///
/// assert_eq!(Role::Assistant.to_string(), "Assistant");
/// assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Stage instructions
    System,
    /// Stage input
    User,
    /// Earlier model output
    Assistant,
}
