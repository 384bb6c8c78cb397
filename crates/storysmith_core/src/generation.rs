//! Identity of one story-generation attempt.

use serde::{Deserialize, Serialize};

/// What to generate: an audience segment, a theme, and an optional variation seed.
///
/// The seed only steers content diversity through the prompts; it never changes
/// which stages run.
///
/// # Examples
///
/// ```
/// use storysmith_core::GenerationRequest;
///
/// let request = GenerationRequest::new("3_6", "friendship").with_variation_seed("a rainy day");
/// assert_eq!(request.audience_segment(), "3_6");
/// assert_eq!(request.variation_seed().as_deref(), Some("a rainy day"));
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct GenerationRequest {
    /// Audience age bracket, e.g. `0_2`
    audience_segment: String,
    /// Thematic label, e.g. `friendship`
    theme: String,
    /// Diversity-steering token
    variation_seed: Option<String>,
}

impl GenerationRequest {
    /// Create a request without a variation seed.
    pub fn new(audience_segment: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            audience_segment: audience_segment.into(),
            theme: theme.into(),
            variation_seed: None,
        }
    }

    /// Attach a variation seed.
    pub fn with_variation_seed(mut self, seed: impl Into<String>) -> Self {
        self.variation_seed = Some(seed.into());
        self
    }
}
