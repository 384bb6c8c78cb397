//! Story generation pipeline for Storysmith.
//!
//! One attempt flows through three model-backed stages:
//!
//! 1. the **query generator** proposes search queries for an audience segment
//!    and theme,
//! 2. the first [`MAX_QUERIES_PER_ATTEMPT`] queries go to the retrieval tool,
//!    whose answers are cut down to short snippets,
//! 3. the **idea synthesizer** drafts a story idea from the snippets, and the
//!    **story composer** writes the story.
//!
//! [`StoryPipeline`] runs those stages. [`StoryArchive`] turns the composer's
//! text into a JSON record on disk, falling back to the raw text when the model
//! ignored the requested format. [`BatchDriver`] repeats this over a
//! [`BatchPlan`], isolating failures per attempt.
//!
//! # Example
//!
//! ```no_run
//! use storysmith_pipeline::{BatchDriver, BatchPlan, StoryArchive, StoryPipeline};
//! # use storysmith_interface::{InferenceDriver, RetrievalTool};
//!
//! # async fn example(driver: impl InferenceDriver, tool: &dyn RetrievalTool) {
//! let pipeline = StoryPipeline::new(driver, tool);
//! let batch = BatchDriver::new(&pipeline, StoryArchive::new("output"));
//! let summary = batch.run(&BatchPlan::single("3_6", "friendship", None)).await;
//! println!("{} of {} stories written", summary.successes().len(), summary.planned());
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod agent;
mod batch;
mod extraction;
mod orchestrator;
mod persistence;
pub mod prompts;
mod retrieval;

pub use agent::{AgentRole, ModelSelection, StageAgent, StageAgents};
pub use batch::{
    AttemptFailure, AttemptId, AttemptSuccess, BatchDriver, BatchPlan, BatchSummary,
    SegmentThemes,
};
pub use extraction::{extract_structured, json_candidate};
pub use orchestrator::{PipelineStage, StoryGenerator, StoryPipeline};
pub use persistence::{
    MAX_IDENTIFIER_BYTES, MAX_IDENTIFIER_CHARS, PersistedStory, StoryArchive, record_from_output,
    safe_identifier, story_identifier,
};
pub use retrieval::{
    MAX_QUERIES_PER_ATTEMPT, RetrievalAdapter, SNIPPET_CHAR_LIMIT, decode_tool_response,
    truncate_chars,
};
