//! Running the pipeline over a (segment x theme) matrix.

use crate::orchestrator::StoryGenerator;
use crate::persistence::{PersistedStory, StoryArchive};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use storysmith_core::GenerationRequest;
use storysmith_error::{StorysmithError, StorysmithResult};
use storysmith_interface::RetrievalConnection;
use tracing::{error, info, instrument, warn};

/// One audience segment and the themes to write for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentThemes {
    /// Segment name, e.g. `3_6`
    pub name: String,
    /// Themes in run order
    pub themes: Vec<String>,
}

impl SegmentThemes {
    /// Create a segment entry.
    pub fn new<I, S>(name: impl Into<String>, themes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            themes: themes.into_iter().map(Into::into).collect(),
        }
    }
}

/// What a batch will run.
///
/// # Examples
///
/// ```
/// use storysmith_pipeline::{BatchPlan, SegmentThemes};
///
/// let plan = BatchPlan::new(
///     vec![
///         SegmentThemes::new("0_2", ["animals", "bedtime", "colors"]),
///         SegmentThemes::new("3_6", ["friendship", "adventure", "nature"]),
///     ],
///     5,
/// );
/// assert_eq!(plan.planned(), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPlan {
    /// Segments in run order
    pub segments: Vec<SegmentThemes>,
    /// Attempts per (segment, theme) pair
    pub stories_per_combination: u32,
    /// Whether attempts get a variation seed
    #[serde(default)]
    pub diversify: bool,
    /// Seeds handed out round-robin by attempt index
    #[serde(default)]
    pub variation_angles: Vec<String>,
}

/// Identity of one attempt within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[display("{}/{} #{}", segment, theme, index)]
pub struct AttemptId {
    /// Audience segment
    pub segment: String,
    /// Theme
    pub theme: String,
    /// 1-based index within the (segment, theme) pair
    pub index: u32,
}

impl BatchPlan {
    /// Plan without diversification.
    pub fn new(segments: Vec<SegmentThemes>, stories_per_combination: u32) -> Self {
        Self {
            segments,
            stories_per_combination,
            diversify: false,
            variation_angles: Vec::new(),
        }
    }

    /// Plan for exactly one attempt.
    pub fn single(segment: impl Into<String>, theme: impl Into<String>, seed: Option<String>) -> Self {
        let theme = theme.into();
        Self {
            segments: vec![SegmentThemes::new(segment, [theme])],
            stories_per_combination: 1,
            diversify: seed.is_some(),
            variation_angles: seed.into_iter().collect(),
        }
    }

    /// Turn on diversification with the given seeds.
    pub fn with_variation_angles(mut self, angles: Vec<String>) -> Self {
        self.diversify = true;
        self.variation_angles = angles;
        self
    }

    /// Total number of attempts.
    pub fn planned(&self) -> usize {
        let pairs: usize = self.segments.iter().map(|s| s.themes.len()).sum();
        pairs * self.stories_per_combination as usize
    }

    /// Seed for the attempt with this 1-based index, if diversifying.
    pub fn variation_seed(&self, index: u32) -> Option<&str> {
        if !self.diversify || self.variation_angles.is_empty() || index == 0 {
            return None;
        }
        let slot = (index as usize - 1) % self.variation_angles.len();
        Some(self.variation_angles[slot].as_str())
    }

    /// Every attempt in run order: segment, then theme, then index.
    pub fn attempts(&self) -> impl Iterator<Item = (AttemptId, GenerationRequest)> + '_ {
        self.segments.iter().flat_map(move |segment| {
            segment.themes.iter().flat_map(move |theme| {
                (1..=self.stories_per_combination).map(move |index| {
                    let mut request = GenerationRequest::new(segment.name.as_str(), theme.as_str());
                    if let Some(seed) = self.variation_seed(index) {
                        request = request.with_variation_seed(seed);
                    }
                    let id = AttemptId {
                        segment: segment.name.clone(),
                        theme: theme.clone(),
                        index,
                    };
                    (id, request)
                })
            })
        })
    }
}

/// A persisted attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptSuccess {
    /// Which attempt
    pub attempt: AttemptId,
    /// File written
    pub path: PathBuf,
    /// Whether the composer text had to be saved as a fallback record
    pub fallback: bool,
}

/// An attempt that produced no record.
#[derive(Debug)]
pub struct AttemptFailure {
    /// Which attempt
    pub attempt: AttemptId,
    /// Why it failed
    pub error: StorysmithError,
}

/// Outcome of a batch.
#[derive(Debug, Default, derive_getters::Getters)]
pub struct BatchSummary {
    planned: usize,
    successes: Vec<AttemptSuccess>,
    failures: Vec<AttemptFailure>,
}

impl BatchSummary {
    /// Attempts that finished, successfully or not.
    pub fn completed(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Successes saved as fallback records.
    pub fn fallbacks(&self) -> usize {
        self.successes.iter().filter(|s| s.fallback).count()
    }

    /// Whether every planned attempt persisted a record.
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty() && self.successes.len() == self.planned
    }
}

/// Runs every attempt of a plan and persists the results.
///
/// Attempts run one at a time. A failed attempt is logged and recorded in the
/// summary; it never stops the batch.
pub struct BatchDriver<'g, G: ?Sized> {
    generator: &'g G,
    archive: StoryArchive,
}

impl<'g, G> BatchDriver<'g, G>
where
    G: StoryGenerator + ?Sized,
{
    /// Create a driver writing into `archive`.
    pub fn new(generator: &'g G, archive: StoryArchive) -> Self {
        Self { generator, archive }
    }

    /// Output archive.
    pub fn archive(&self) -> &StoryArchive {
        &self.archive
    }

    /// Run the whole plan.
    #[instrument(skip(self, plan), fields(planned = plan.planned(), output = %self.archive.root().display()))]
    pub async fn run(&self, plan: &BatchPlan) -> BatchSummary {
        let planned = plan.planned();
        let mut summary = BatchSummary {
            planned,
            ..BatchSummary::default()
        };

        for (position, (attempt, request)) in plan.attempts().enumerate() {
            info!(
                attempt = position + 1,
                planned,
                segment = %attempt.segment,
                theme = %attempt.theme,
                story_index = attempt.index,
                "Starting attempt"
            );

            match self.run_attempt(&request, attempt.index).await {
                Ok(stored) => summary.successes.push(AttemptSuccess {
                    attempt,
                    fallback: stored.record.is_fallback(),
                    path: stored.path,
                }),
                Err(e) => {
                    error!(
                        segment = %attempt.segment,
                        theme = %attempt.theme,
                        story_index = attempt.index,
                        error = %e,
                        "Attempt failed"
                    );
                    summary.failures.push(AttemptFailure { attempt, error: e });
                }
            }
        }

        info!(
            planned,
            succeeded = summary.successes.len(),
            fallbacks = summary.fallbacks(),
            failed = summary.failures.len(),
            "Batch complete"
        );
        summary
    }

    /// Open `connection`, run the plan, then close the connection.
    ///
    /// A failure to close is logged and does not discard the summary; the
    /// stories are already on disk by then.
    ///
    /// # Errors
    ///
    /// Only when the connection cannot be opened, in which case nothing runs.
    pub async fn run_connected<C>(
        &self,
        connection: &C,
        plan: &BatchPlan,
    ) -> StorysmithResult<BatchSummary>
    where
        C: RetrievalConnection + ?Sized,
    {
        connection.connect().await?;
        let summary = self.run(plan).await;
        if let Err(e) = connection.close().await {
            warn!(error = %e, "Failed to close retrieval connection after batch");
        }
        Ok(summary)
    }

    async fn run_attempt(
        &self,
        request: &GenerationRequest,
        index: u32,
    ) -> StorysmithResult<PersistedStory> {
        let output = self.generator.generate_story(request).await?;
        self.archive.persist(&output, request, index).await
    }
}
