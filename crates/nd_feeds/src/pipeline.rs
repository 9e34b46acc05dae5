use crate::collector::FeedCollector;
use chrono::Local;
use nd_core::{Article, Result};
use nd_digest::DigestGenerator;
use nd_storage::NewsStore;
use serde::Serialize;
use tracing::info;

/// Outcome of one digest run.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineReport {
    /// No source produced an article inside the recency window; nothing was
    /// generated or persisted.
    NoRecentArticles,
    Completed { date: String, collected: usize },
}

/// Collect → generate → persist, strictly sequential. A run on a date that
/// already has a digest overwrites that date key.
///
/// Concurrent runs are not guarded: two admins triggering at once race on
/// the archive write and the last writer wins. Single-admin use is assumed.
pub struct DigestPipeline {
    store: NewsStore,
    collector: FeedCollector,
    generator: DigestGenerator,
}

impl DigestPipeline {
    pub fn new(store: NewsStore, collector: FeedCollector, generator: DigestGenerator) -> Self {
        Self {
            store,
            collector,
            generator,
        }
    }

    pub async fn run(&self) -> Result<PipelineReport> {
        let feeds = self.store.load_feeds().await?;
        info!(sources = feeds.len(), "starting digest run");
        let articles = self.collector.collect(&feeds).await;

        let date = Local::now().format("%Y-%m-%d").to_string();
        self.digest_and_store(&articles, &date).await
    }

    async fn digest_and_store(&self, articles: &[Article], date: &str) -> Result<PipelineReport> {
        if articles.is_empty() {
            info!("no recent articles, skipping generation");
            return Ok(PipelineReport::NoRecentArticles);
        }

        // Generation failures propagate here, before the archive is touched:
        // an error message is never stored as digest content.
        let digest = self.generator.generate(articles).await?;

        let mut archive = self.store.load_archive().await?;
        archive.insert(date.to_string(), digest);
        self.store
            .save_archive(&archive, &format!("Update report for {}", date))
            .await?;

        info!(date, collected = articles.len(), "digest stored");
        Ok(PipelineReport::Completed {
            date: date.to_string(),
            collected: articles.len(),
        })
    }
}
