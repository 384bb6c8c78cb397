//! Layered configuration loading.
//!
//! Sources, later ones overriding earlier ones:
//! - Bundled defaults (include_str! from storysmith.toml)
//! - `~/.config/storysmith/storysmith.toml`
//! - `./storysmith.toml`
//! - A file named on the command line
//! - Environment variables `STORYSMITH__SECTION__KEY`

use config::{Config, ConfigBuilder, Environment, File, FileFormat, Map, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storysmith_error::{ConfigError, StorysmithResult};
use storysmith_mcp_client::McpServerConfig;
use storysmith_pipeline::{BatchPlan, ModelSelection};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../storysmith.toml");

const ENV_PREFIX: &str = "STORYSMITH";
const ENV_SEPARATOR: &str = "__";

/// Inference server and model choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Ollama host, including scheme
    pub host: String,
    /// Ollama port
    pub port: u16,
    /// Model for query generation
    pub query_model: String,
    /// Model for ideation and composition
    pub story_model: String,
}

impl ModelsConfig {
    /// Per-stage model choice for the pipeline.
    pub fn selection(&self) -> ModelSelection {
        ModelSelection::new(self.query_model.as_str(), self.story_model.as_str())
    }
}

/// Where records are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root of the output tree
    pub directory: PathBuf,
}

/// Complete Storysmith configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorysmithConfig {
    /// `[models]`
    pub models: ModelsConfig,
    /// `[retrieval]`
    pub retrieval: McpServerConfig,
    /// `[output]`
    pub output: OutputConfig,
    /// `[batch]`
    pub batch: BatchPlan,
}

impl StorysmithConfig {
    /// Load every configuration layer.
    ///
    /// User config files are optional and silently skipped when absent; an
    /// explicitly named file must exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use storysmith::StorysmithConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = StorysmithConfig::load(None)?;
    /// println!("writing to {}", config.output.directory.display());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> StorysmithResult<Self> {
        debug!("Loading configuration: env > explicit > current dir > home dir > bundled defaults");

        let mut builder = Self::bundled_builder();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storysmith/storysmith.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storysmith").required(false));

        Self::finish(builder, explicit, None)
    }

    /// Bundled defaults, an optional file, and the given variables in place
    /// of the process environment.
    pub fn load_isolated(
        explicit: Option<&Path>,
        environment: Map<String, String>,
    ) -> StorysmithResult<Self> {
        Self::finish(Self::bundled_builder(), explicit, Some(environment))
    }

    /// Only the bundled defaults.
    pub fn bundled() -> StorysmithResult<Self> {
        Self::load_isolated(None, Map::new())
    }

    fn bundled_builder() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(
        mut builder: ConfigBuilder<DefaultState>,
        explicit: Option<&Path>,
        environment: Option<Map<String, String>>,
    ) -> StorysmithResult<Self> {
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(environment),
        );

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> StorysmithResult<()> {
        if self.retrieval.command().trim().is_empty() {
            return Err(ConfigError::new("retrieval.command must not be empty").into());
        }
        if *self.retrieval.timeout_seconds() == 0 {
            return Err(ConfigError::new("retrieval.timeout_seconds must be positive").into());
        }
        if self.models.query_model.trim().is_empty() || self.models.story_model.trim().is_empty() {
            return Err(ConfigError::new("models.query_model and models.story_model must be set").into());
        }
        if let Some(segment) = self.batch.segments.iter().find(|s| s.name.trim().is_empty()) {
            return Err(ConfigError::new(format!(
                "batch segment with themes {:?} has no name",
                segment.themes
            ))
            .into());
        }
        Ok(())
    }

    /// Replace the output directory.
    pub fn with_output_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.output.directory = directory.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_defaults() {
        let config = StorysmithConfig::bundled().unwrap();
        assert_eq!(config.models.host, "http://localhost");
        assert_eq!(config.models.port, 11434);
        assert_eq!(config.models.query_model, "PetrosStav/gemma3-tools:4b");
        assert_eq!(config.retrieval.command(), "uvx");
        assert_eq!(config.retrieval.tool(), "rag_search");
        assert_eq!(*config.retrieval.timeout_seconds(), 60);
        assert_eq!(config.output.directory, PathBuf::from("output"));
        assert_eq!(config.batch.stories_per_combination, 5);
        assert_eq!(config.batch.segments[0].name, "0_2");
        assert_eq!(config.batch.planned(), 45);
    }

    #[test]
    fn test_selection_uses_both_models() {
        let config = StorysmithConfig::bundled().unwrap();
        let selection = config.models.selection();
        assert_eq!(selection.query_model.as_deref(), Some("PetrosStav/gemma3-tools:4b"));
        assert_eq!(
            selection.story_model.as_deref(),
            Some("adi0adi/ollama_stheno-8b_v3.1_q6k")
        );
    }
}
