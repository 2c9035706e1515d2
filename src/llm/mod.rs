// ABOUTME: LLM module — the generative completion service behind the conversation.
// ABOUTME: Defines the request shape, typed errors, and the CompletionService seam.

pub mod gemini;

use async_trait::async_trait;

use crate::chat::Role;
use crate::config::LlmConfig;

pub use gemini::GeminiClient;

/// Sampling and output parameters sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

impl From<&LlmConfig> for GenerationConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
            response_mime_type: config.response_mime_type.clone(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::from(&LlmConfig::default())
    }
}

/// One turn of context handed to the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextTurn {
    pub role: Role,
    pub text: String,
}

impl ContextTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// A prior context plus the new user message.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub history: Vec<ContextTurn>,
    pub message: String,
    pub generation: GenerationConfig,
}

/// Failures of the completion service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompletionError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("response contained no text")]
    EmptyResponse,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("no API key configured")]
    MissingApiKey,
}

/// A hosted model that turns a request into generated text.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;

    /// Name shown in the status bar.
    fn model_id(&self) -> &str;
}
