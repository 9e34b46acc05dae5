pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use config::Config;
pub use error::Error;
pub use models::Summarizer;
pub use storage::DocumentStore;
pub use types::{latest_date, sorted_dates_desc, Article, DigestArchive, Stats};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::models::Summarizer;
    pub use crate::storage::DocumentStore;
    pub use crate::types::{Article, DigestArchive, Stats};
    pub use crate::{Error, Result};
}
