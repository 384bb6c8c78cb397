//! Stateless model-backed stage agents.

use crate::prompts;
use serde::{Deserialize, Serialize};
use storysmith_core::{GenerateRequest, GenerationRequest, Message};
use storysmith_error::StorysmithResult;
use storysmith_interface::InferenceDriver;
use tracing::{debug, instrument};

/// Which pipeline stage an agent serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum AgentRole {
    /// Turns (segment, theme) into search queries
    #[display("Query Generator")]
    QueryGenerator,
    /// Turns retrieval results into a story idea
    #[display("Idea Synthesizer")]
    IdeaSynthesizer,
    /// Turns a story idea into the finished story
    #[display("Story Composer")]
    StoryComposer,
}

/// Model identifiers per stage group.
///
/// `None` leaves the choice to the inference backend's default model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelection {
    /// Model for query generation
    #[serde(default)]
    pub query_model: Option<String>,
    /// Model for ideation and composition
    #[serde(default)]
    pub story_model: Option<String>,
}

impl ModelSelection {
    /// Select both models explicitly.
    pub fn new(query_model: impl Into<String>, story_model: impl Into<String>) -> Self {
        Self {
            query_model: Some(query_model.into()),
            story_model: Some(story_model.into()),
        }
    }
}

/// One stage agent: fixed instructions plus a model choice.
///
/// Agents keep no conversation state; each [`invoke`](Self::invoke) sends
/// exactly one system message and one user message.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct StageAgent {
    role: AgentRole,
    instructions: String,
    model: Option<String>,
}

impl StageAgent {
    /// Create an agent.
    pub fn new(role: AgentRole, instructions: impl Into<String>, model: Option<String>) -> Self {
        Self {
            role,
            instructions: instructions.into(),
            model,
        }
    }

    /// Build the request this agent sends for `input`.
    pub fn request(&self, input: &str) -> GenerateRequest {
        let request = GenerateRequest::new(vec![
            Message::system(self.instructions.as_str()),
            Message::user(input),
        ]);
        match &self.model {
            Some(model) => request.with_model(model.as_str()),
            None => request,
        }
    }

    /// Run the agent once and return the model's raw text.
    #[instrument(skip(self, driver, input), fields(role = %self.role, input_length = input.len()))]
    pub async fn invoke<D>(&self, driver: &D, input: &str) -> StorysmithResult<String>
    where
        D: InferenceDriver + ?Sized,
    {
        let response = driver.generate(&self.request(input)).await?;
        debug!(output_length = response.text.len(), "Agent responded");
        Ok(response.text)
    }
}

/// The three agents of one attempt.
#[derive(Debug, Clone)]
pub struct StageAgents {
    /// Query generation
    pub query_generator: StageAgent,
    /// Ideation
    pub idea_synthesizer: StageAgent,
    /// Composition
    pub story_composer: StageAgent,
}

impl StageAgents {
    /// Build the agents for one attempt.
    ///
    /// A variation seed on the request switches the query generator and the
    /// idea synthesizer to their diversified instructions.
    pub fn for_request(request: &GenerationRequest, models: &ModelSelection) -> Self {
        let segment = request.audience_segment();
        let theme = request.theme();
        let seed = request.variation_seed().as_deref();

        Self {
            query_generator: StageAgent::new(
                AgentRole::QueryGenerator,
                prompts::query_generator_instructions(segment, theme, seed),
                models.query_model.clone(),
            ),
            idea_synthesizer: StageAgent::new(
                AgentRole::IdeaSynthesizer,
                prompts::ideator_instructions(segment, theme, seed),
                models.story_model.clone(),
            ),
            story_composer: StageAgent::new(
                AgentRole::StoryComposer,
                prompts::composer_instructions(segment, theme),
                models.story_model.clone(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storysmith_core::Role;

    #[test]
    fn test_request_has_system_then_user() {
        let agent = StageAgent::new(
            AgentRole::StoryComposer,
            "Write nicely.",
            Some("story-model".to_string()),
        );
        let request = agent.request("An idea");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, "Write nicely.");
        assert_eq!(request.messages[1], Message::user("An idea"));
        assert_eq!(request.model.as_deref(), Some("story-model"));
    }

    #[test]
    fn test_request_without_model_uses_backend_default() {
        let agent = StageAgent::new(AgentRole::QueryGenerator, "Plan searches.", None);
        let request = agent.request("3_6 friendship");
        assert_eq!(
            request,
            GenerateRequest::new(vec![
                Message::system("Plan searches."),
                Message::user("3_6 friendship"),
            ])
        );
        assert!(request.model.is_none());
    }

    #[test]
    fn test_models_are_assigned_per_stage() {
        let models = ModelSelection::new("small-tools", "storyteller");
        let agents =
            StageAgents::for_request(&GenerationRequest::new("0_2", "animals"), &models);

        assert_eq!(agents.query_generator.model().as_deref(), Some("small-tools"));
        assert_eq!(agents.idea_synthesizer.model().as_deref(), Some("storyteller"));
        assert_eq!(agents.story_composer.model().as_deref(), Some("storyteller"));
        assert_eq!(*agents.story_composer.role(), AgentRole::StoryComposer);
    }

    #[test]
    fn test_seed_reaches_instructions() {
        let request =
            GenerationRequest::new("3_6", "friendship").with_variation_seed("under the sea");
        let agents = StageAgents::for_request(&request, &ModelSelection::default());

        assert!(agents.query_generator.instructions().contains("under the sea"));
        assert!(agents.idea_synthesizer.instructions().contains("under the sea"));
        assert!(!agents.story_composer.instructions().contains("under the sea"));
        assert!(agents.query_generator.model().is_none());
    }
}
