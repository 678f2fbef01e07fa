//! Text-generation integration for the offline context generator.

mod gemini;
mod mock;
pub mod prompt;

pub use gemini::{GeminiClient, GeminiConfig};
pub use mock::MockLlmClient;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for text-generation clients.
///
/// Implementations must be thread-safe (Send + Sync) to support async
/// operations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generates a completion for the given prompt.
    ///
    /// Returns the complete response as a single string.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
