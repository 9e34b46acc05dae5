use crate::prompt::build_prompt;
use nd_core::{Article, Result, Summarizer};
use std::sync::Arc;
use tracing::info;

/// Returned instead of calling the backend when there is nothing to digest.
pub const NO_RECENT_NEWS: &str = "No recent news to analyze.";

/// Turns a bounded batch of articles into a markdown digest via the
/// configured summarization backend.
pub struct DigestGenerator {
    backend: Arc<dyn Summarizer>,
}

impl DigestGenerator {
    pub fn new(backend: Arc<dyn Summarizer>) -> Self {
        Self { backend }
    }

    /// Empty input short-circuits to [`NO_RECENT_NEWS`] without touching the
    /// backend. Backend failures propagate as errors; they are never folded
    /// into the digest text.
    pub async fn generate(&self, articles: &[Article]) -> Result<String> {
        if articles.is_empty() {
            return Ok(NO_RECENT_NEWS.to_string());
        }

        let prompt = build_prompt(articles);
        info!(
            backend = self.backend.name(),
            articles = articles.len().min(crate::MAX_ARTICLES),
            "requesting digest"
        );
        self.backend.generate(&prompt).await
    }
}
