//! Utilities for extracting structured data from model responses.
//!
//! Models are asked to answer with JSON inside a markdown code block, but
//! often add prose around it, forget the fence, or ignore the request
//! entirely. Extraction never panics: every failure comes back as a
//! [`ParseError`] that still carries the complete response.

use serde::de::DeserializeOwned;
use serde_json::error::Category;
use storysmith_error::{ParseError, ParseErrorKind};

const FENCE: &str = "```";

/// Pick the text that should hold the JSON document.
///
/// When the response contains a code fence, the candidate is the segment
/// between the first fence and the next one (or the end of the text if the
/// block was never closed), minus a leading language tag such as `json`.
/// Without a fence the whole response is the candidate. Surrounding
/// whitespace is removed either way.
///
/// # Examples
///
/// ```
/// use storysmith_pipeline::json_candidate;
///
/// let response = "Here you go:\n```json\n{\"queries\": []}\n```\nEnjoy!";
/// assert_eq!(json_candidate(response), "{\"queries\": []}");
///
/// assert_eq!(json_candidate("  {\"a\": 1}  "), "{\"a\": 1}");
/// ```
pub fn json_candidate(response: &str) -> &str {
    match response.split_once(FENCE) {
        Some((_, after_fence)) => {
            let block = after_fence
                .split_once(FENCE)
                .map_or(after_fence, |(inside, _)| inside);
            strip_language_tag(block).trim()
        }
        None => response.trim(),
    }
}

/// Drop an info string like `json` or `JSON5` from the start of a code block.
fn strip_language_tag(block: &str) -> &str {
    let start = block.trim_start_matches([' ', '\t']);
    let tag_len = start
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.')))
        .unwrap_or(start.len());
    &start[tag_len..]
}

/// Extract and decode a JSON document of type `T` from a model response.
///
/// # Errors
///
/// - [`ParseErrorKind::Empty`] when nothing is left after fence stripping
/// - [`ParseErrorKind::InvalidJson`] when the candidate is not JSON
/// - [`ParseErrorKind::UnexpectedShape`] when it is JSON but a required key is
///   missing or has the wrong type
///
/// The error's `raw` field is always the full, unmodified `response`.
///
/// # Examples
///
/// ```
/// use storysmith_core::SearchQuerySet;
/// use storysmith_error::ParseErrorKind;
/// use storysmith_pipeline::extract_structured;
///
/// let response = "```json\n{\"queries\": [\"a\", \"b\", \"c\"]}\n```";
/// let set: SearchQuerySet = extract_structured(response).unwrap();
/// assert_eq!(set.queries.len(), 3);
///
/// let err = extract_structured::<SearchQuerySet>("Sure! Here are some ideas.").unwrap_err();
/// assert!(matches!(err.kind, ParseErrorKind::InvalidJson(_)));
/// assert_eq!(err.raw, "Sure! Here are some ideas.");
/// ```
pub fn extract_structured<T: DeserializeOwned>(response: &str) -> Result<T, ParseError> {
    let candidate = json_candidate(response);

    if candidate.is_empty() {
        tracing::debug!(
            response_length = response.len(),
            "No JSON content in model response"
        );
        return Err(ParseError::new(ParseErrorKind::Empty, response));
    }

    serde_json::from_str(candidate).map_err(|e| {
        let kind = match e.classify() {
            Category::Data => ParseErrorKind::UnexpectedShape(e.to_string()),
            Category::Syntax | Category::Eof | Category::Io => {
                ParseErrorKind::InvalidJson(e.to_string())
            }
        };
        tracing::debug!(
            response_length = response.len(),
            error = %kind,
            "Model response did not decode"
        );
        ParseError::new(kind, response)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use storysmith_core::{SearchQuerySet, StoryRecord};

    #[test]
    fn test_fenced_json_with_tag() {
        let response = "```json\n{\"queries\": [\"q1\", \"q2\", \"q3\"]}\n```";
        let set: SearchQuerySet = extract_structured(response).unwrap();
        assert_eq!(set.queries, vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn test_fenced_json_without_tag() {
        let response = "Result:\n```\n{\"queries\": [\"q1\"]}\n```";
        let set: SearchQuerySet = extract_structured(response).unwrap();
        assert_eq!(set.queries, vec!["q1"]);
    }

    #[test]
    fn test_uppercase_tag_and_same_line_json() {
        assert_eq!(json_candidate("```JSON {\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(json_candidate("```json{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn test_unclosed_fence_takes_rest() {
        let response = "```json\n{\"queries\": [\"q1\", \"q2\"]}";
        let set: SearchQuerySet = extract_structured(response).unwrap();
        assert_eq!(set.queries.len(), 2);
    }

    #[test]
    fn test_only_first_block_is_used() {
        let response = "```json\n{\"n\": 1}\n```\nand also\n```json\n{\"n\": 2}\n```";
        let value: Value = extract_structured(response).unwrap();
        assert_eq!(value, json!({"n": 1}));
    }

    #[test]
    fn test_bare_json_without_fence() {
        let value: Value = extract_structured("\n  {\"title\": \"x\"}  \n").unwrap();
        assert_eq!(value["title"], "x");
    }

    #[test]
    fn test_fenced_equals_inner_decode() {
        let inner = r#"{"title": "The Kind Fox", "story": "Once...", "keywords": ["fox", "kind"]}"#;
        let fenced = format!("Here is your story!\n```json\n{inner}\n```\nHope you like it.");
        let direct: Value = serde_json::from_str(inner).unwrap();
        let extracted: Value = extract_structured(&fenced).unwrap();
        assert_eq!(direct, extracted);
    }

    #[test]
    fn test_prose_is_invalid_json() {
        let prose = "Once upon a time, a little duck waddled to the pond.";
        let err = extract_structured::<StoryRecord>(prose).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::InvalidJson(_)));
        assert_eq!(err.raw, prose);
    }

    #[test]
    fn test_missing_required_key_is_shape_error() {
        let response = "```json\n{\"title\": \"No story here\"}\n```";
        let err = extract_structured::<StoryRecord>(response).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedShape(_)));
        assert_eq!(err.raw, response);
    }

    #[test]
    fn test_empty_fence_is_empty() {
        let err = extract_structured::<Value>("```json\n```").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Empty);

        let err = extract_structured::<Value>("   ").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Empty);
    }

    #[test]
    fn test_truncated_json_is_invalid() {
        let err = extract_structured::<Value>("```json\n{\"title\": \"The").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::InvalidJson(_)));
    }

    #[test]
    fn test_odd_inputs_never_panic() {
        let inputs = [
            "",
            "```",
            "``````",
            "```json",
            "````json\n{}\n````",
            "```\u{1F98A}\n{}\n```",
            "{{{{",
            "]",
            "null",
            "\u{0}\u{1}",
            "```json\n\"just a string\"\n```",
        ];
        for input in inputs {
            let _ = extract_structured::<StoryRecord>(input);
            let _ = extract_structured::<Value>(input);
        }
    }
}
