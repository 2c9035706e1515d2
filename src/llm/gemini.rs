//! Google Gemini `generateContent` client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{CompletionError, CompletionRequest, CompletionService};
use crate::chat::Role;
use crate::config::LlmConfig;

/// Gemini service implementation
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }

    /// Build a client reading the key from the env var named in config.
    pub fn from_env(config: &LlmConfig) -> anyhow::Result<Self> {
        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            tracing::warn!(
                "{} is not set; completions will fail until it is",
                config.api_key_env
            );
        }
        Self::new(config, api_key)
    }

    /// Per-request transport timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Model => "model",
    }
}

fn translate_request(request: &CompletionRequest) -> GeminiRequest {
    let mut contents: Vec<GeminiContent> = request
        .history
        .iter()
        .map(|turn| GeminiContent {
            role: Some(role_name(turn.role).to_string()),
            parts: vec![GeminiPart {
                text: Some(turn.text.clone()),
            }],
        })
        .collect();

    contents.push(GeminiContent {
        role: Some(role_name(Role::User).to_string()),
        parts: vec![GeminiPart {
            text: Some(request.message.clone()),
        }],
    });

    let generation = &request.generation;
    GeminiRequest {
        contents,
        generation_config: GeminiGenerationConfig {
            temperature: generation.temperature,
            top_p: generation.top_p,
            top_k: generation.top_k,
            max_output_tokens: generation.max_output_tokens,
            response_mime_type: generation.response_mime_type.clone(),
        },
    }
}

fn normalize_response(resp: GeminiResponse) -> Result<String, CompletionError> {
    let candidate = resp
        .candidates
        .into_iter()
        .next()
        .ok_or(CompletionError::EmptyResponse)?;

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.trim().is_empty() {
        return Err(CompletionError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl CompletionService for GeminiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingApiKey)?;
        let gemini_request = translate_request(request);
        tracing::debug!(
            "POST {} ({} context turns)",
            self.endpoint(),
            request.history.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Network(format!("Request timeout: {}", e))
                } else if e.is_connect() {
                    CompletionError::Network(format!("Connection failed: {}", e))
                } else {
                    CompletionError::Network(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        normalize_response(gemini_response)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ContextTurn, GenerationConfig};

    fn sample_request() -> CompletionRequest {
        CompletionRequest {
            history: vec![
                ContextTurn::user("System prompt: be helpful"),
                ContextTurn::model("Namaste!"),
                ContextTurn::user("How do I prepare?"),
            ],
            message: "How do I prepare?".to_string(),
            generation: GenerationConfig::default(),
        }
    }

    #[test]
    fn request_serializes_history_then_message() {
        let json = serde_json::to_value(translate_request(&sample_request())).unwrap();
        let contents = json["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 4);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "Namaste!");
        assert_eq!(contents[3]["parts"][0]["text"], "How do I prepare?");
    }

    #[test]
    fn request_carries_generation_config() {
        let json = serde_json::to_value(translate_request(&sample_request())).unwrap();
        let config = &json["generationConfig"];
        assert_eq!(config["temperature"], 1.0);
        assert_eq!(config["topK"], 64);
        assert_eq!(config["maxOutputTokens"], 8192);
        assert_eq!(config["responseMimeType"], "text/plain");
        assert!((config["topP"].as_f64().unwrap() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn response_text_parts_are_joined() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Focus on "},{"text":"DSA."}]},"finishReason":"STOP"}]}"#;
        let resp: GeminiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(normalize_response(resp).unwrap(), "Focus on DSA.");
    }

    #[test]
    fn response_without_candidates_is_empty() {
        let resp: GeminiResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
        assert_eq!(normalize_response(resp), Err(CompletionError::EmptyResponse));
    }

    #[test]
    fn blocked_candidate_without_content_is_empty() {
        let resp: GeminiResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(normalize_response(resp), Err(CompletionError::EmptyResponse));
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let client = GeminiClient::new(&LlmConfig::default(), Some(String::new())).unwrap();
        let result = client.complete(&sample_request()).await;
        assert_eq!(result, Err(CompletionError::MissingApiKey));
    }

    #[test]
    fn endpoint_uses_configured_model() {
        let config = LlmConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..LlmConfig::default()
        };
        let client = GeminiClient::new(&config, None).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-pro:generateContent"
        );
        assert_eq!(client.model_id(), "gemini-pro");
        assert_eq!(client.timeout(), Duration::from_secs(300));
    }

    #[test]
    fn timeout_comes_from_config() {
        let config = LlmConfig {
            timeout_seconds: 45,
            ..LlmConfig::default()
        };
        let client = GeminiClient::new(&config, None).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(45));
    }
}
