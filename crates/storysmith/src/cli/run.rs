//! Story generation command handlers.

use crate::StorysmithConfig;
use storysmith_error::StorysmithResult;
use storysmith_mcp_client::McpRetrievalClient;
use storysmith_models::OllamaClient;
use storysmith_pipeline::{BatchDriver, BatchPlan, BatchSummary, StoryArchive, StoryPipeline};
use tracing::{info, instrument, warn};

/// Generate one story.
pub async fn run_single(
    config: &StorysmithConfig,
    segment: String,
    theme: String,
    seed: Option<String>,
) -> StorysmithResult<BatchSummary> {
    run_plan(config, &BatchPlan::single(segment, theme, seed)).await
}

/// Generate the configured matrix.
pub async fn run_batch(
    config: &StorysmithConfig,
    count: Option<u32>,
    diversify: bool,
) -> StorysmithResult<BatchSummary> {
    let mut plan = config.batch.clone();
    if let Some(count) = count {
        plan.stories_per_combination = count;
    }
    if diversify {
        plan.diversify = true;
    }
    if plan.diversify && plan.variation_angles.is_empty() {
        warn!("Diversification requested but batch.variation_angles is empty");
    }
    run_plan(config, &plan).await
}

/// Check the model server, open the retrieval connection, run the plan and
/// close the connection again.
#[instrument(skip_all, fields(planned = plan.planned()))]
async fn run_plan(config: &StorysmithConfig, plan: &BatchPlan) -> StorysmithResult<BatchSummary> {
    let driver = OllamaClient::new_with_url(
        config.models.story_model.as_str(),
        config.models.host.as_str(),
        config.models.port,
    );
    driver
        .validate([config.models.query_model.as_str()])
        .await?;

    let retrieval = McpRetrievalClient::new(config.retrieval.clone());
    let pipeline = StoryPipeline::new(&driver, &retrieval).with_models(config.models.selection());
    let archive = StoryArchive::new(config.output.directory.clone());
    let summary = BatchDriver::new(&pipeline, archive)
        .run_connected(&retrieval, plan)
        .await?;

    info!(
        succeeded = summary.successes().len(),
        failed = summary.failures().len(),
        "Run finished"
    );
    Ok(summary)
}

/// Print a human-readable summary.
pub fn print_summary(summary: &BatchSummary) {
    println!(
        "Wrote {} of {} stories ({} saved as raw text, {} failed)",
        summary.successes().len(),
        summary.planned(),
        summary.fallbacks(),
        summary.failures().len()
    );
    for success in summary.successes() {
        let marker = if success.fallback { " (raw text)" } else { "" };
        println!("  {} -> {}{}", success.attempt, success.path.display(), marker);
    }
    for failure in summary.failures() {
        println!("  {} failed: {}", failure.attempt, failure.error);
    }
}
