use nd_core::{DigestArchive, DocumentStore, Result, Stats};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

pub const ARCHIVE_PATH: &str = "data/news_data.json";
pub const FEEDS_PATH: &str = "data/feeds.json";
pub const STATS_PATH: &str = "data/stats.json";

/// Typed access to the three well-known documents. Absence of a document
/// yields its type-appropriate empty value; decode and transport failures
/// still propagate so "legitimately empty" stays distinguishable from
/// "store unreachable".
#[derive(Clone)]
pub struct NewsStore {
    store: Arc<dyn DocumentStore>,
}

impl NewsStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn read_or<T: DeserializeOwned>(&self, path: &str, default: T) -> Result<T> {
        match self.store.read(path).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(default),
        }
    }

    async fn write_json<T: Serialize>(&self, path: &str, value: &T, message: &str) -> Result<()> {
        // Indented JSON; serde_json leaves non-ASCII unescaped.
        let content = serde_json::to_string_pretty(value)?;
        self.store.write(path, &content, message).await
    }

    pub async fn load_archive(&self) -> Result<DigestArchive> {
        self.read_or(ARCHIVE_PATH, DigestArchive::new()).await
    }

    pub async fn save_archive(&self, archive: &DigestArchive, message: &str) -> Result<()> {
        self.write_json(ARCHIVE_PATH, archive, message).await
    }

    pub async fn load_feeds(&self) -> Result<Vec<String>> {
        self.read_or(FEEDS_PATH, Vec::new()).await
    }

    pub async fn save_feeds(&self, feeds: &[String], message: &str) -> Result<()> {
        self.write_json(FEEDS_PATH, &feeds, message).await
    }

    pub async fn load_stats(&self) -> Result<Stats> {
        self.read_or(STATS_PATH, Stats::default()).await
    }

    pub async fn save_stats(&self, stats: &Stats, message: &str) -> Result<()> {
        self.write_json(STATS_PATH, stats, message).await
    }
}
