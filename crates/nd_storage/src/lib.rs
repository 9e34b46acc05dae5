pub mod backends;
pub mod documents;

pub use backends::{GithubStore, MemoryStore};
pub use documents::{NewsStore, ARCHIVE_PATH, FEEDS_PATH, STATS_PATH};

pub mod prelude {
    pub use crate::documents::NewsStore;
    pub use nd_core::{DocumentStore, Error, Result};
}
