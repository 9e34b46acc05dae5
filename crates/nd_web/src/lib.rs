use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/digest/latest", get(handlers::latest_digest))
        .route("/api/digest/dates", get(handlers::list_dates))
        .route("/api/digest/:date", get(handlers::digest_by_date))
        .route(
            "/api/admin/feeds",
            get(handlers::list_feeds).post(handlers::add_feed),
        )
        .route("/api/admin/run", post(handlers::run_pipeline))
        .route("/api/admin/stats", get(handlers::view_stats))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::AppState;
    pub use nd_core::{Error, Result};
}
