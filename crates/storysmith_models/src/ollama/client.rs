//! Ollama client implementation.

use ollama_rs::Ollama;
use ollama_rs::generation::completion::request::GenerationRequest as OllamaRequest;

use super::conversion::split_messages;
use storysmith_core::{GenerateRequest, GenerateResponse};
use storysmith_error::{ExternalCallError, ExternalCallErrorKind, StorysmithResult};
use storysmith_interface::InferenceDriver;
use tracing::{debug, info, instrument, warn};

/// Default Ollama host.
pub const DEFAULT_HOST: &str = "http://localhost";

/// Default Ollama port.
pub const DEFAULT_PORT: u16 = 11434;

/// Ollama client for local model execution.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    /// Ollama client instance
    client: Ollama,

    /// Default model name (e.g., "llama3", "mistral")
    model_name: String,

    /// Ollama server URL, for diagnostics
    base_url: String,
}

impl OllamaClient {
    /// Create a new Ollama client with default localhost connection.
    pub fn new(model_name: impl Into<String>) -> Self {
        Self::new_with_url(model_name, DEFAULT_HOST, DEFAULT_PORT)
    }

    /// Create a new Ollama client for a custom host and port.
    pub fn new_with_url(model_name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        let model_name = model_name.into();
        let host = host.into();
        let base_url = format!("{}:{}", host, port);

        info!(
            model = %model_name,
            url = %base_url,
            "Creating Ollama client"
        );

        let client = Ollama::new(host, port);

        Self {
            client,
            model_name,
            base_url,
        }
    }

    /// Server URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the server is reachable and every listed model is pulled.
    ///
    /// The client's default model is always checked.
    #[instrument(skip(self, extra_models))]
    pub async fn validate<'a>(
        &self,
        extra_models: impl IntoIterator<Item = &'a str>,
    ) -> StorysmithResult<()> {
        debug!("Validating Ollama server and model availability");

        let models = match self.client.list_local_models().await {
            Ok(models) => models,
            Err(e) => {
                warn!(error = %e, "Failed to connect to Ollama server");
                return Err(ExternalCallError::new(ExternalCallErrorKind::ServerNotRunning(
                    self.base_url.clone(),
                ))
                .into());
            }
        };

        debug!(count = models.len(), "Found local models");

        let extra: Vec<String> = extra_models.into_iter().map(str::to_string).collect();
        let wanted = std::iter::once(self.model_name.as_str()).chain(extra.iter().map(String::as_str));
        for name in wanted {
            if !models.iter().any(|m| model_matches(&m.name, name)) {
                warn!(
                    model = %name,
                    available = ?models.iter().map(|m| &m.name).collect::<Vec<_>>(),
                    "Model not found locally"
                );
                return Err(ExternalCallError::new(ExternalCallErrorKind::ModelNotFound(
                    name.to_string(),
                ))
                .into());
            }
        }

        info!("Ollama server and models validated");
        Ok(())
    }
}

/// Ollama lists models with an explicit tag, so `llama3` matches `llama3:latest`.
fn model_matches(listed: &str, wanted: &str) -> bool {
    listed == wanted || (!wanted.contains(':') && listed == format!("{}:latest", wanted))
}

#[async_trait::async_trait]
impl InferenceDriver for OllamaClient {
    #[instrument(skip(self, request), fields(model))]
    async fn generate(&self, request: &GenerateRequest) -> StorysmithResult<GenerateResponse> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.model_name.clone());
        tracing::Span::current().record("model", model.as_str());

        let (system, prompt) = split_messages(&request.messages);
        debug!(prompt_length = prompt.len(), "Converted messages to prompt");

        let mut ollama_req = OllamaRequest::new(model, prompt);
        if let Some(system) = system {
            ollama_req = ollama_req.system(system);
        }

        let response = self.client.generate(ollama_req).await.map_err(|e| {
            ExternalCallError::new(ExternalCallErrorKind::Inference(e.to_string()))
        })?;

        debug!(
            response_length = response.response.len(),
            "Received response from Ollama"
        );

        Ok(GenerateResponse::new(response.response))
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
