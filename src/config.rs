// ABOUTME: Configuration loading for advisor.
// ABOUTME: Reads ~/.advisor/config.toml and applies CLI overrides on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub llm: LlmConfig,
    pub session: SessionConfig,
}

/// Remote authentication API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Generative model configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
    /// Transport bound for one completion request.
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-pro".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            temperature: 1.0,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 8192,
            response_mime_type: "text/plain".to_string(),
            timeout_seconds: 300,
        }
    }
}

/// Where the session token is persisted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub path: Option<PathBuf>,
}

impl SessionConfig {
    /// The configured token file, or the default under the advisor home.
    pub fn token_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| Config::home_dir().join("session.json"))
    }
}

impl Config {
    /// Load config from ~/.advisor/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, api_url: Option<String>, model: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|s| !s.is_empty()) {
            self.api.base_url = url;
        }
        if let Some(model) = model.filter(|s| !s.is_empty()) {
            self.llm.model = model;
        }
        self
    }

    /// Base directory for all advisor files.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".advisor")
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Path to the secrets env file loaded at startup.
    pub fn secrets_env_path() -> PathBuf {
        Self::home_dir().join("secrets.env")
    }

    /// Default path of the diagnostic log.
    pub fn log_path() -> PathBuf {
        Self::home_dir().join("advisor.log")
    }
}
