//! Writing composer output to disk, one JSON file per attempt.

use crate::extraction::extract_structured;
use std::path::{Path, PathBuf};
use storysmith_core::{FallbackRecord, GenerationRequest, PersistedRecord, StoryRecord};
use storysmith_error::{StorageError, StorageErrorKind, StorysmithResult};
use tracing::{debug, instrument, warn};

/// Maximum length of a derived identifier, in characters.
pub const MAX_IDENTIFIER_CHARS: usize = 100;

/// Maximum length of a derived identifier, in UTF-8 bytes.
///
/// Leaves room for the `_{index}.json` suffix under the common 255-byte file
/// name limit.
pub const MAX_IDENTIFIER_BYTES: usize = 200;

const FORBIDDEN_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Turn arbitrary text into a filesystem-safe name.
///
/// Removes `<>:"/\|?*` and control characters, replaces spaces with `_`,
/// keeps at most [`MAX_IDENTIFIER_CHARS`] characters and
/// [`MAX_IDENTIFIER_BYTES`] bytes, then trims dots and whitespace from both
/// ends. The result may be empty.
///
/// # Examples
///
/// ```
/// use storysmith_pipeline::safe_identifier;
///
/// assert_eq!(safe_identifier("The Kind Fox"), "The_Kind_Fox");
/// assert_eq!(safe_identifier("What?! A <Fox>: Part 1/2"), "What!_A_Fox_Part_12");
/// assert_eq!(safe_identifier("..."), "");
/// ```
pub fn safe_identifier(text: &str) -> String {
    let mut cleaned = String::new();
    let kept = text
        .trim()
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c) && !c.is_control())
        .map(|c| if c == ' ' { '_' } else { c })
        .take(MAX_IDENTIFIER_CHARS);
    for c in kept {
        if cleaned.len() + c.len_utf8() > MAX_IDENTIFIER_BYTES {
            break;
        }
        cleaned.push(c);
    }

    cleaned
        .trim_matches(|c: char| c == '.' || c.is_whitespace())
        .to_string()
}

/// File stem for a story: the safe title, or `story_{index}` when there is no
/// usable title.
///
/// # Examples
///
/// ```
/// use storysmith_pipeline::story_identifier;
///
/// assert_eq!(story_identifier(Some("Moon Boat"), 2), "Moon_Boat");
/// assert_eq!(story_identifier(Some("???"), 2), "story_2");
/// assert_eq!(story_identifier(None, 3), "story_3");
/// ```
pub fn story_identifier(title: Option<&str>, index: u32) -> String {
    let identifier = title.map(safe_identifier).unwrap_or_default();
    if identifier.is_empty() {
        format!("story_{}", index)
    } else {
        identifier
    }
}

/// Directory name for a segment or theme.
fn directory_component(name: &str) -> String {
    let component = safe_identifier(name);
    if component.is_empty() {
        "unnamed".to_string()
    } else {
        component
    }
}

/// Turn composer text into the record to persist.
///
/// A decodable story gets the attempt's segment, theme and index merged in,
/// replacing whatever the model wrote for them. Anything else becomes a
/// fallback record holding the text verbatim.
pub fn record_from_output(output: &str, request: &GenerationRequest, index: u32) -> PersistedRecord {
    match extract_structured::<StoryRecord>(output) {
        Ok(mut story) => {
            story.age_group = request.audience_segment().clone();
            story.genre = request.theme().clone();
            story.story_index = Some(index);
            PersistedRecord::Story(story)
        }
        Err(e) => {
            warn!(
                segment = %request.audience_segment(),
                theme = %request.theme(),
                story_index = index,
                reason = %e.kind,
                "Composer output is not a story record, saving raw text"
            );
            PersistedRecord::Fallback(FallbackRecord {
                age_group: request.audience_segment().clone(),
                genre: request.theme().clone(),
                story_index: index,
                content: e.into_raw(),
            })
        }
    }
}

/// A record that has been written.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedStory {
    /// Where it was written
    pub path: PathBuf,
    /// What was written
    pub record: PersistedRecord,
}

/// Output tree rooted at one directory.
///
/// Files land at `{root}/{segment}/{theme}/{identifier}_{index}.json`. Two
/// attempts with the same title and index in the same (segment, theme)
/// overwrite each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryArchive {
    root: PathBuf,
}

impl StoryArchive {
    /// Archive writing under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a record will be written to.
    pub fn path_for(&self, request: &GenerationRequest, record: &PersistedRecord) -> PathBuf {
        let index = record.story_index();
        self.root
            .join(directory_component(request.audience_segment()))
            .join(directory_component(request.theme()))
            .join(format!("{}_{}.json", story_identifier(record.title(), index), index))
    }

    /// Extract, merge and write one attempt's composer output.
    ///
    /// # Errors
    ///
    /// Only I/O and serialization failures; unparseable output is persisted as
    /// a fallback record.
    #[instrument(
        skip(self, output, request),
        fields(segment = %request.audience_segment(), theme = %request.theme())
    )]
    pub async fn persist(
        &self,
        output: &str,
        request: &GenerationRequest,
        index: u32,
    ) -> StorysmithResult<PersistedStory> {
        let record = record_from_output(output, request, index);
        let path = self.path_for(request, &record);
        self.write(&path, &record).await?;
        debug!(path = %path.display(), fallback = record.is_fallback(), "Record written");
        Ok(PersistedStory { path, record })
    }

    async fn write(&self, path: &Path, record: &PersistedRecord) -> StorysmithResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let json = serde_json::to_string_pretty(record).map_err(|e| {
            StorageError::new(StorageErrorKind::Serialization(e.to_string()))
        })?;

        tokio::fs::write(path, json).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        Ok(())
    }
}
