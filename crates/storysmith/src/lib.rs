//! Storysmith - children's story generation pipeline
//!
//! Storysmith writes children's stories for a matrix of audience segments and
//! themes. Each story is produced by three model-backed stages (search query
//! generation, story ideation, story composition) with a retrieval step in
//! between, and is saved as one JSON file per attempt.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use storysmith::{
//!     BatchDriver, BatchPlan, McpRetrievalClient, OllamaClient, StoryArchive, StoryPipeline,
//!     StorysmithConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StorysmithConfig::load(None)?;
//!     let driver = OllamaClient::new("llama3");
//!     let retrieval = McpRetrievalClient::new(config.retrieval.clone());
//!     retrieval.connect().await?;
//!
//!     let pipeline = StoryPipeline::new(&driver, &retrieval);
//!     let summary = BatchDriver::new(&pipeline, StoryArchive::new("output"))
//!         .run(&BatchPlan::single("3_6", "friendship", None))
//!         .await;
//!
//!     retrieval.close().await?;
//!     println!("{} stories written", summary.successes().len());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Storysmith is organized as a workspace with focused crates:
//!
//! - `storysmith_error` - Error types
//! - `storysmith_core` - Core data types (requests, story records)
//! - `storysmith_interface` - `InferenceDriver` and `RetrievalTool` traits
//! - `storysmith_models` - Ollama inference backend
//! - `storysmith_mcp_client` - MCP stdio client used for retrieval
//! - `storysmith_pipeline` - Extraction, stage agents, orchestration, persistence, batches
//!
//! This crate (`storysmith`) re-exports everything for convenience and adds
//! configuration loading.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;

pub use config::{ModelsConfig, OutputConfig, StorysmithConfig};

pub use storysmith_core::*;
pub use storysmith_error::*;
pub use storysmith_interface::*;
pub use storysmith_mcp_client::{McpRetrievalClient, McpServerConfig, McpSession};
pub use storysmith_models::*;
pub use storysmith_pipeline::*;
