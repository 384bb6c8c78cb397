//! Inference backend integrations for Storysmith.
//!
//! Each provider lives behind its own feature flag.
//!
//! # Available Providers
//!
//! - **Ollama** (local models) - Enable with `ollama` feature (default)
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "ollama")]
//! # {
//! use storysmith_core::{GenerateRequest, Message};
//! use storysmith_interface::InferenceDriver;
//! use storysmith_models::OllamaClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new("llama3");
//! let request = GenerateRequest::new(vec![Message::user("Hello")]);
//! let response = client.generate(&request).await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "ollama")]
mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::{DEFAULT_HOST, DEFAULT_PORT, OllamaClient, split_messages};
