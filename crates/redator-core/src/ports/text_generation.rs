//! Text generation port - abstraction over hosted completion APIs.

use std::time::Duration;

use async_trait::async_trait;

/// A single-turn completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction framing the assistant's role.
    pub system: String,
    /// User message.
    pub prompt: String,
    pub temperature: f32,
    /// Upper bound on completion length.
    pub max_tokens: u32,
}

/// Client for an external text-generation API.
///
/// One call is one round trip; implementations never retry.
#[async_trait]
pub trait TextGenerationClient: Send + Sync {
    /// Request a completion and return its text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, TextGenerationError>;
}

/// Text generation errors.
#[derive(Debug, thiserror::Error)]
pub enum TextGenerationError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Completion contained no text")]
    EmptyResponse,

    #[error("Text generation provider is not configured")]
    NotConfigured,
}
