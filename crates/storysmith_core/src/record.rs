//! Records written to disk, one per completed attempt.

use crate::StoryRecord;
use serde::{Deserialize, Serialize};

/// The raw composer output, kept when it could not be parsed into a [`StoryRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackRecord {
    /// Audience segment
    pub age_group: String,
    /// Theme
    pub genre: String,
    /// Position within its (segment, theme) group
    pub story_index: u32,
    /// Unparsed composer output, verbatim
    pub content: String,
}

/// Exactly one of these exists per completed attempt.
///
/// Both shapes carry `age_group`, `genre` and `story_index`.
///
/// # Examples
///
/// ```
/// use storysmith_core::{FallbackRecord, PersistedRecord};
///
/// let record = PersistedRecord::Fallback(FallbackRecord {
///     age_group: "0_2".to_string(),
///     genre: "animals".to_string(),
///     story_index: 4,
///     content: "Once upon a time".to_string(),
/// });
/// assert!(record.is_fallback());
/// assert_eq!(record.story_index(), 4);
/// assert_eq!(record.title(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(untagged)]
pub enum PersistedRecord {
    /// Structured story with pipeline metadata merged in
    Story(StoryRecord),
    /// Raw composer output
    Fallback(FallbackRecord),
}

impl PersistedRecord {
    /// Title, when the record is structured.
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Story(story) => Some(story.title.as_str()),
            Self::Fallback(_) => None,
        }
    }

    /// Audience segment.
    pub fn age_group(&self) -> &str {
        match self {
            Self::Story(story) => &story.age_group,
            Self::Fallback(fallback) => &fallback.age_group,
        }
    }

    /// Theme.
    pub fn genre(&self) -> &str {
        match self {
            Self::Story(story) => &story.genre,
            Self::Fallback(fallback) => &fallback.genre,
        }
    }

    /// Position within the (segment, theme) group.
    pub fn story_index(&self) -> u32 {
        match self {
            Self::Story(story) => story.story_index.unwrap_or_default(),
            Self::Fallback(fallback) => fallback.story_index,
        }
    }

    /// Whether structured extraction failed for this attempt.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}
