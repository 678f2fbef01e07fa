//! Gemini LLM client implementation.
//!
//! Implements the LlmClient trait for Google's Generative Language API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::error::{BridgeError, Result};
use crate::llm::LlmClient;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini API base URL.
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Maximum number of retry attempts for transient errors.
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const RETRY_BASE_DELAY_MS: u64 = 1000;

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Model to use (e.g., "gemini-2.5-flash").
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Creates a new config with the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Gemini LLM client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new Gemini client with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BridgeError::llm(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            base_url: GEMINI_API_URL.to_string(),
        })
    }

    /// Creates a client from the environment-derived [`LlmConfig`].
    ///
    /// Requires `GEMINI_API_KEY`; `LLM_MODEL` is optional.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| BridgeError::llm("GEMINI_API_KEY environment variable not set"))?;

        Self::new(GeminiConfig::new(api_key, config.model.clone()))
    }

    /// Overrides the API base URL (for tests).
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Parses an API error response and returns (error, is_retryable).
    fn parse_error(status: reqwest::StatusCode, body: &str) -> (BridgeError, bool) {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return (
                BridgeError::llm("Authentication failed. Check your GEMINI_API_KEY."),
                false,
            );
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return (
                BridgeError::llm("Rate limited. Please wait and try again."),
                true,
            );
        }

        let is_retryable = status.is_server_error();

        if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(body) {
            return (
                BridgeError::llm(format!("Gemini API error: {}", error_response.error.message)),
                is_retryable,
            );
        }

        (
            BridgeError::llm(format!("Gemini API error ({status}): {body}")),
            is_retryable,
        )
    }

    /// Determines if a request error is retryable.
    fn is_retryable_request_error(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect()
    }

    /// Sends one request. Returns the response text, or the mapped error
    /// paired with whether it is worth retrying.
    async fn send_request(
        &self,
        prompt: &str,
    ) -> std::result::Result<String, (BridgeError, bool)> {
        let url = format!("{}/{}:generateContent", self.base_url, self.config.model);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let retryable = Self::is_retryable_request_error(&e);
                (BridgeError::llm(format!("Request failed: {e}")), retryable)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| (BridgeError::llm(format!("Failed to read response: {e}")), false))?;

        if !status.is_success() {
            return Err(Self::parse_error(status, &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| (BridgeError::llm(format!("Failed to parse response: {e}")), false))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err((BridgeError::llm("Gemini returned an empty response"), false));
        }

        Ok(text)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let mut delay = Duration::from_millis(RETRY_BASE_DELAY_MS);

        for attempt in 1..=MAX_RETRY_ATTEMPTS {
            debug!(
                "Gemini request attempt {} of {}",
                attempt, MAX_RETRY_ATTEMPTS
            );

            match self.send_request(prompt).await {
                Ok(text) => return Ok(text),
                Err((e, retryable)) => {
                    if attempt < MAX_RETRY_ATTEMPTS && retryable {
                        warn!("Attempt {} failed ({e}), retrying in {:?}", attempt, delay);
                        tokio::time::sleep(delay).await;
                        delay *= 2;
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(BridgeError::llm("All retry attempts failed"))
    }
}

// === API types ===

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

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = GeminiConfig::new("key", "gemini-2.5-flash").with_timeout(30);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let llm_config = LlmConfig {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
        };
        assert!(GeminiClient::from_config(&llm_config).is_err());
    }

    #[test]
    fn test_parse_error_unauthorized() {
        let (err, retryable) =
            GeminiClient::parse_error(reqwest::StatusCode::UNAUTHORIZED, "{}");
        assert!(err.to_string().contains("Authentication failed"));
        assert!(!retryable);
    }

    #[test]
    fn test_parse_error_rate_limited_is_retryable() {
        let (_, retryable) =
            GeminiClient::parse_error(reqwest::StatusCode::TOO_MANY_REQUESTS, "{}");
        assert!(retryable);
    }

    #[test]
    fn test_parse_error_extracts_api_message() {
        let body = r#"{"error": {"message": "model not found"}}"#;
        let (err, _) = GeminiClient::parse_error(reqwest::StatusCode::NOT_FOUND, body);
        assert!(err.to_string().contains("model not found"));
    }

    #[test]
    fn test_response_deserialization() {
        let body = r###"{
            "candidates": [
                {"content": {"parts": [{"text": "## OVERVIEW:"}, {"text": " more"}]}}
            ]
        }"###;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.candidates[0].content.parts[0].text, "## OVERVIEW:");
    }
}
