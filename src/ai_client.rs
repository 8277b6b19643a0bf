//! Google Gemini API client for document analysis
//!
//! Every analysis operation funnels through [`GeminiClient::send`]. When
//! no API key is configured the client runs in demo mode: it returns a
//! fixed canned reply without contacting any network. Demo/live is decided
//! once at construction from an explicit config, never from ambient global
//! state, so tests can instantiate both modes side by side.

use serde::{Deserialize, Serialize};
use crate::error::{AnalyzerError, Result};
use crate::settings;

/// Default generative model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Reply returned by [`GeminiClient::send`] in demo mode.
pub const DEMO_RESPONSE: &str =
    "**Demo Mode Response:** This is a simulated AI response for demonstration purposes.";

/// Dispatcher configuration. A missing API key selects demo mode.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
}

impl GeminiConfig {
    /// Demo-mode config: no credential, no network access.
    pub fn demo() -> Self {
        Self { api_key: None, model: DEFAULT_MODEL.to_string() }
    }

    /// Live config with an explicit key and model.
    pub fn live(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self { api_key: Some(api_key.into()), model: model.into() }
    }

    /// Read key and model from settings (the env var wins inside settings).
    pub fn from_settings() -> Self {
        Self {
            api_key: settings::get_api_key().filter(|k| !k.is_empty()),
            model: settings::get_model(),
        }
    }
}

/// Gemini API request format
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt_token_count: Option<u64>,
    #[serde(rename = "candidatesTokenCount")]
    candidates_token_count: Option<u64>,
}

/// Client for one generative backend, fixed to demo or live at construction.
pub struct GeminiClient {
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self { config }
    }

    pub fn is_demo(&self) -> bool {
        self.config.api_key.is_none()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a prompt and return the model's raw text reply.
    ///
    /// Demo mode returns [`DEMO_RESPONSE`] deterministically. Live mode
    /// forwards the prompt verbatim; any transport or API failure is
    /// terminal for this call. No retry, no caching.
    pub async fn send(&self, prompt: &str) -> Result<String> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Ok(DEMO_RESPONSE.to_string());
        };

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt.to_string() }],
            }],
        };

        let url = format!("{}/{}:generateContent", API_BASE, self.config.model);

        let client = reqwest::Client::new();
        let response = client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalyzerError::Dispatch(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::Dispatch(format!("API error {}: {}", status, body)));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AnalyzerError::Dispatch(format!("Failed to parse response: {}", e)))?;

        // Track token usage
        if let Some(usage) = &api_response.usage_metadata {
            let _ = settings::add_gemini_tokens(
                usage.prompt_token_count.unwrap_or(0),
                usage.candidates_token_count.unwrap_or(0),
            );
        }

        let text: String = api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<Vec<_>>().join(""))
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AnalyzerError::Dispatch("model returned no candidates".to_string()));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_config_has_no_key() {
        let client = GeminiClient::new(GeminiConfig::demo());
        assert!(client.is_demo());
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_live_config_is_not_demo() {
        let client = GeminiClient::new(GeminiConfig::live("test-key", "gemini-1.5-pro"));
        assert!(!client.is_demo());
        assert_eq!(client.model(), "gemini-1.5-pro");
    }

    #[tokio::test]
    async fn test_demo_send_is_canned_and_offline() {
        let client = GeminiClient::new(GeminiConfig::demo());
        let first = client.send("summarize this").await.unwrap();
        let second = client.send("something completely different").await.unwrap();
        assert_eq!(first, DEMO_RESPONSE);
        assert_eq!(second, DEMO_RESPONSE);
    }
}
