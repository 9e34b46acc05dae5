use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A normalized feed entry. Ephemeral: produced by the collector, consumed
/// by the digest generator, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: NaiveDate,
}

impl Article {
    /// Publication date rendered the way it appears in prompts and date keys.
    pub fn published_key(&self) -> String {
        self.published.format("%Y-%m-%d").to_string()
    }
}

/// Date key ("YYYY-MM-DD") to markdown digest. At most one digest per date;
/// a rerun on the same date overwrites that key.
pub type DigestArchive = BTreeMap<String, String>;

/// Keys in display order: descending by date (lexicographic equals
/// chronological for ISO date keys).
pub fn sorted_dates_desc(archive: &DigestArchive) -> Vec<String> {
    archive.keys().rev().cloned().collect()
}

pub fn latest_date(archive: &DigestArchive) -> Option<&String> {
    archive.keys().next_back()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub views: u64,
}
