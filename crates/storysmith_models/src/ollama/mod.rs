//! Ollama inference client.

mod client;
mod conversion;

pub use client::{DEFAULT_HOST, DEFAULT_PORT, OllamaClient};
pub use conversion::split_messages;
