//! Mock LLM client for testing.

use crate::error::{BridgeError, Result};
use crate::llm::LlmClient;
use async_trait::async_trait;
use std::sync::Mutex;

/// A mock LLM client returning a canned response and recording prompts.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    response: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    /// Creates a mock that fails every completion.
    pub fn failing() -> Self {
        Self {
            response: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock returning the given text for every completion.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .expect("mock lock poisoned")
            .push(prompt.to_string());

        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(BridgeError::llm("mock completion failure")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_prompts() {
        let client = MockLlmClient::with_response("ok");
        let out = client.complete("hello").await.unwrap();
        assert_eq!(out, "ok");
        assert_eq!(client.prompts(), vec!["hello"]);
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let client = MockLlmClient::failing();
        assert!(client.complete("hello").await.is_err());
    }
}
