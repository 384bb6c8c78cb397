//! Conversion from Storysmith messages to an Ollama completion prompt.

use storysmith_core::{Message, Role};

/// Split messages into a system prompt and a completion prompt.
///
/// System messages become the system prompt. When the conversation is a
/// single user turn its text is the prompt as-is; longer conversations are
/// flattened with role prefixes.
///
/// # Examples
///
/// ```
/// use storysmith_core::Message;
/// use storysmith_models::split_messages;
///
/// let (system, prompt) = split_messages(&[
///     Message::system("Write for toddlers."),
///     Message::user("A duck story."),
/// ]);
/// assert_eq!(system.as_deref(), Some("Write for toddlers."));
/// assert_eq!(prompt, "A duck story.");
/// ```
pub fn split_messages(messages: &[Message]) -> (Option<String>, String) {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let turns: Vec<&Message> = messages.iter().filter(|m| m.role != Role::System).collect();

    let prompt = match turns.as_slice() {
        [only] if only.role == Role::User => only.content.clone(),
        _ => {
            let mut prompt = String::new();
            for msg in turns {
                prompt.push_str(&format!("{}: {}\n\n", msg.role, msg.content));
            }
            prompt
        }
    };

    let system = if system.is_empty() {
        None
    } else {
        Some(system.join("\n\n"))
    };

    (system, prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_system_message() {
        let (system, prompt) = split_messages(&[Message::user("hi")]);
        assert!(system.is_none());
        assert_eq!(prompt, "hi");
    }

    #[test]
    fn test_multi_turn_is_prefixed() {
        let (_, prompt) = split_messages(&[
            Message::user("first"),
            Message {
                role: Role::Assistant,
                content: "reply".to_string(),
            },
            Message::user("second"),
        ]);
        assert!(prompt.starts_with("User: first"));
        assert!(prompt.contains("Assistant: reply"));
        assert!(prompt.trim_end().ends_with("User: second"));
    }
}
