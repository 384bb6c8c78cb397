//! Retrieval snippets.

use serde::{Deserialize, Serialize};

/// One piece of retrieved text and the page it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snippet {
    /// Snippet text, bounded by the retrieval adapter
    pub text: String,
    /// Source URL
    pub source: String,
}

/// The snippets returned for a single search query.
///
/// # Examples
///
/// ```
/// use storysmith_core::{RetrievalResult, Snippet};
///
/// let result = RetrievalResult::new(
///     "toddler animal stories",
///     vec![Snippet { text: "Ducks waddle".to_string(), source: "https://example.com".to_string() }],
/// );
/// assert_eq!(result.sources(), vec!["https://example.com"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// The query that produced these snippets
    pub query: String,
    /// Snippets in tool order
    pub snippets: Vec<Snippet>,
}

impl RetrievalResult {
    /// Create a result for a query.
    pub fn new(query: impl Into<String>, snippets: Vec<Snippet>) -> Self {
        Self {
            query: query.into(),
            snippets,
        }
    }

    /// Whether the tool found nothing.
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Source URLs in snippet order.
    pub fn sources(&self) -> Vec<&str> {
        self.snippets.iter().map(|s| s.source.as_str()).collect()
    }
}
