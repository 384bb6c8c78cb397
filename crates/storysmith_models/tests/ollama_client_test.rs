//! Tests for the Ollama client.
//!
//! The ignored tests require Ollama running locally with the llama3 model pulled.
//! Run with: cargo test --package storysmith_models -- --ignored

#![cfg(feature = "ollama")]

use storysmith_core::{GenerateRequest, Message};
use storysmith_error::{ExternalCallErrorKind, StorysmithErrorKind};
use storysmith_interface::InferenceDriver;
use storysmith_models::OllamaClient;

#[tokio::test]
#[ignore] // Requires Ollama running locally
async fn test_ollama_basic_generation() {
    let client = OllamaClient::new("llama3");

    client
        .validate(std::iter::empty())
        .await
        .expect("Ollama server not available");

    let request = GenerateRequest::new(vec![
        Message::system("Answer with a single word."),
        Message::user("Say hello"),
    ]);

    let response = client.generate(&request).await.expect("Generation failed");
    assert!(!response.text.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_ollama_model_validation() {
    let client = OllamaClient::new("nonexistent_model");

    let err = client
        .validate(std::iter::empty())
        .await
        .expect_err("model should be missing");

    match err.kind() {
        StorysmithErrorKind::ExternalCall(e) => {
            assert!(matches!(e.kind, ExternalCallErrorKind::ModelNotFound(_)))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_ollama_server_not_running() {
    // Nothing listens on port 1
    let client = OllamaClient::new_with_url("llama3", "http://127.0.0.1", 1);

    let err = client
        .validate(["mistral"])
        .await
        .expect_err("server should be unreachable");

    match err.kind() {
        StorysmithErrorKind::ExternalCall(e) => {
            assert!(matches!(e.kind, ExternalCallErrorKind::ServerNotRunning(_)))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_generate_against_dead_server_is_inference_error() {
    let client = OllamaClient::new_with_url("llama3", "http://127.0.0.1", 1);
    let request = GenerateRequest::new(vec![Message::user("hi")]).with_model("llama3");

    let err = client.generate(&request).await.expect_err("should fail");
    assert!(matches!(err.kind(), StorysmithErrorKind::ExternalCall(_)));
}
