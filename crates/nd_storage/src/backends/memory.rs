use async_trait::async_trait;
use nd_core::{DocumentStore, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory document store for tests and local runs. Commit messages are
/// accepted and dropped; there is no history.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, path: &str) -> Result<Option<String>> {
        let documents = self.documents.read().await;
        Ok(documents.get(path).cloned())
    }

    async fn write(&self, path: &str, content: &str, _message: &str) -> Result<()> {
        let mut documents = self.documents.write().await;
        documents.insert(path.to_string(), content.to_string());
        Ok(())
    }
}
