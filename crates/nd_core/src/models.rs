use crate::Result;
use async_trait::async_trait;

/// A generative-text backend that turns an assembled prompt into prose.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Human-readable backend name, for logs.
    fn name(&self) -> &str;

    /// Send the prompt and return the backend's text response verbatim.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
