//! Structured outputs of the three pipeline stages.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Search queries proposed by the query generator.
///
/// The generator is asked for three queries; only a prefix is ever searched.
///
/// # Examples
///
/// ```
/// use storysmith_core::SearchQuerySet;
///
/// let set: SearchQuerySet = serde_json::from_str(r#"{"queries": ["a", "b", "c"]}"#).unwrap();
/// assert_eq!(set.consumed(2), ["a".to_string(), "b".to_string()]);
/// assert_eq!(set.consumed(5).len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuerySet {
    /// Queries in the order the model produced them
    pub queries: Vec<String>,
}

impl SearchQuerySet {
    /// The first `limit` queries (fewer if the model produced fewer).
    pub fn consumed(&self, limit: usize) -> &[String] {
        &self.queries[..self.queries.len().min(limit)]
    }
}

/// A story outline produced by the idea synthesizer.
///
/// Parsing is best effort: the composer always receives the ideator's raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryIdea {
    /// Working title
    pub title: String,
    /// Main characters
    #[serde(default)]
    pub characters: String,
    /// Where the story takes place
    #[serde(default)]
    pub setting: String,
    /// The central problem
    #[serde(default)]
    pub conflict: String,
    /// How the problem is resolved
    #[serde(default)]
    pub resolution: String,
    /// Source URLs the idea drew on
    #[serde(default)]
    pub sources: Vec<String>,
}

/// A finished story as returned by the story composer.
///
/// `title` and `story` are required. The remaining fields are read leniently:
/// a missing or `null` value becomes empty, a lone string where a list belongs
/// becomes a one-item list, and other scalars are kept as their JSON text.
/// Keys the model adds beyond these are kept in `extra` and written back out
/// unchanged.
///
/// # Examples
///
/// ```
/// use storysmith_core::StoryRecord;
///
/// let record: StoryRecord = serde_json::from_str(
///     r#"{"title": "The Kind Fox", "story": "Once...", "summary": null, "keywords": "fox", "mood": "gentle"}"#,
/// ).unwrap();
/// assert_eq!(record.title, "The Kind Fox");
/// assert_eq!(record.summary, "");
/// assert_eq!(record.keywords, ["fox"]);
/// assert_eq!(record.extra["mood"], "gentle");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRecord {
    /// Story title
    pub title: String,
    /// Audience segment the story was written for
    #[serde(default, deserialize_with = "lenient_text")]
    pub age_group: String,
    /// Theme the story was written for
    #[serde(default, deserialize_with = "lenient_text")]
    pub genre: String,
    /// Full story text
    pub story: String,
    /// A handful of keywords
    #[serde(default, deserialize_with = "lenient_list")]
    pub keywords: Vec<String>,
    /// One or two sentence summary for parents and educators
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary: String,
    /// Sources that inspired the story
    #[serde(default, deserialize_with = "lenient_list")]
    pub site_links: Vec<String>,
    /// Position within its (segment, theme) group, set when persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_index: Option<u32>,
    /// Any other keys the model emitted
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

fn scalar_text(value: JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(JsonValue::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    })
}
