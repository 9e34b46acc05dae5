use crate::Result;
use async_trait::async_trait;

/// A remote, versioned, file-oriented document store.
///
/// Absence is typed: `read` returns `Ok(None)` for a path that does not
/// exist, while transport and decode failures are `Err`. Callers that want
/// an empty default on absence must not conflate it with an unreachable
/// store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the raw UTF-8 content at `path`, or `None` if no such file.
    async fn read(&self, path: &str) -> Result<Option<String>>;

    /// Write `content` to `path`, creating the file if it does not exist.
    /// `message` is the commit message recorded by versioned backends.
    async fn write(&self, path: &str, content: &str, message: &str) -> Result<()>;
}
