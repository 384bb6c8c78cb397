//! Sequencing of the three stages for a single attempt.

use crate::agent::{ModelSelection, StageAgents};
use crate::extraction::extract_structured;
use crate::prompts;
use crate::retrieval::{MAX_QUERIES_PER_ATTEMPT, RetrievalAdapter};
use async_trait::async_trait;
use storysmith_core::{GenerationRequest, SearchQuerySet, StoryIdea};
use storysmith_error::StorysmithResult;
use storysmith_interface::{InferenceDriver, RetrievalTool};
use tracing::{debug, instrument};

/// Where an attempt currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PipelineStage {
    /// Asking for search queries
    GeneratingQueries,
    /// Running the consumed queries against the retrieval tool
    Retrieving,
    /// Turning snippets into a story idea
    Ideating,
    /// Writing the story
    Composing,
    /// Composer text is ready
    Done,
}

/// Anything that can turn a generation request into composer text.
///
/// The batch driver depends on this rather than on [`StoryPipeline`] so
/// attempts can be simulated.
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    /// Produce the raw composer output for one attempt.
    async fn generate_story(&self, request: &GenerationRequest) -> StorysmithResult<String>;
}

/// Runs query generation, retrieval, ideation and composition in order.
///
/// The retrieval tool is borrowed: its connection is opened before the
/// pipeline is built and closed after it is dropped.
pub struct StoryPipeline<'a, D, R: ?Sized> {
    driver: D,
    retrieval: &'a R,
    models: ModelSelection,
}

impl<'a, D, R> StoryPipeline<'a, D, R>
where
    D: InferenceDriver,
    R: RetrievalTool + ?Sized,
{
    /// Create a pipeline that uses the backend's default model everywhere.
    pub fn new(driver: D, retrieval: &'a R) -> Self {
        Self {
            driver,
            retrieval,
            models: ModelSelection::default(),
        }
    }

    /// Choose the query and story models.
    pub fn with_models(mut self, models: ModelSelection) -> Self {
        self.models = models;
        self
    }

    /// Model selection in use.
    pub fn models(&self) -> &ModelSelection {
        &self.models
    }

    /// Run one attempt and return the composer's raw text.
    ///
    /// # Errors
    ///
    /// - Parse failure when the query generator's output is not a query set
    /// - Transport or shape errors from any retrieval call
    /// - Inference failures from any stage
    ///
    /// The first error aborts the attempt; there is no partial continuation.
    #[instrument(
        skip(self, request),
        fields(
            segment = %request.audience_segment(),
            theme = %request.theme(),
            seed = ?request.variation_seed(),
        )
    )]
    pub async fn run(&self, request: &GenerationRequest) -> StorysmithResult<String> {
        let agents = StageAgents::for_request(request, &self.models);

        let mut stage = PipelineStage::GeneratingQueries;
        debug!(%stage, "Entering stage");
        let raw_queries = agents
            .query_generator
            .invoke(
                &self.driver,
                &prompts::query_generator_input(request.audience_segment(), request.theme()),
            )
            .await?;
        let query_set: SearchQuerySet = extract_structured(&raw_queries)?;
        debug!(generated = query_set.queries.len(), "Parsed search queries");

        stage = PipelineStage::Retrieving;
        debug!(%stage, "Entering stage");
        let adapter = RetrievalAdapter::new(self.retrieval);
        let consumed = query_set.consumed(MAX_QUERIES_PER_ATTEMPT);
        let mut results = Vec::with_capacity(consumed.len());
        for query in consumed {
            results.push(adapter.retrieve(query).await?);
        }

        stage = PipelineStage::Ideating;
        debug!(%stage, "Entering stage");
        let ideation = agents
            .idea_synthesizer
            .invoke(&self.driver, &prompts::ideation_input(&results))
            .await?;
        match extract_structured::<StoryIdea>(&ideation) {
            Ok(idea) => debug!(title = %idea.title, "Story idea parsed"),
            Err(e) => debug!(reason = %e.kind, "Story idea is free text, passing it on as-is"),
        }

        stage = PipelineStage::Composing;
        debug!(%stage, "Entering stage");
        let story = agents
            .story_composer
            .invoke(&self.driver, &ideation)
            .await?;

        stage = PipelineStage::Done;
        debug!(%stage, output_length = story.len(), "Pipeline finished");
        Ok(story)
    }
}

#[async_trait]
impl<'a, D, R> StoryGenerator for StoryPipeline<'a, D, R>
where
    D: InferenceDriver,
    R: RetrievalTool + ?Sized,
{
    async fn generate_story(&self, request: &GenerationRequest) -> StorysmithResult<String> {
        self.run(request).await
    }
}
