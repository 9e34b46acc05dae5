use nd_core::Config;
use nd_feeds::DigestPipeline;
use nd_storage::NewsStore;
use std::sync::atomic::AtomicU64;

pub struct AppState {
    pub store: NewsStore,
    pub pipeline: DigestPipeline,
    pub config: Config,
    /// Views counted this process when persistence is off; stays at zero
    /// when `config.persist_views` routes the counter through the store.
    pub session_views: AtomicU64,
}

impl AppState {
    pub fn new(store: NewsStore, pipeline: DigestPipeline, config: Config) -> Self {
        Self {
            store,
            pipeline,
            config,
            session_views: AtomicU64::new(0),
        }
    }
}
