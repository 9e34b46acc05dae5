pub mod collector;
pub mod pipeline;

pub use collector::{FeedCollector, RECENT_WINDOW_DAYS};
pub use pipeline::{DigestPipeline, PipelineReport};

pub mod prelude {
    pub use crate::collector::FeedCollector;
    pub use crate::pipeline::{DigestPipeline, PipelineReport};
    pub use nd_core::{Article, Error, Result};
}
