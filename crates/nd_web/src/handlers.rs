use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use nd_core::{latest_date, sorted_dates_desc, Error};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::warn;

type ApiError = (StatusCode, Json<Value>);
type ApiResult = Result<Json<Value>, ApiError>;

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

fn store_error(e: Error) -> ApiError {
    api_error(StatusCode::BAD_GATEWAY, e.to_string())
}

#[derive(Deserialize)]
pub struct AdminAuth {
    password: String,
}

#[derive(Deserialize)]
pub struct AddFeedRequest {
    password: String,
    url: String,
}

fn authorize(state: &AppState, password: &str) -> Result<(), ApiError> {
    if password == state.config.admin_password {
        Ok(())
    } else {
        Err(api_error(StatusCode::UNAUTHORIZED, "invalid password"))
    }
}

/// Count a read of the primary view. When persistence is on, the counter
/// lives in the stats document; a failed write only loses the increment,
/// never the response.
async fn count_view(state: &AppState) {
    if !state.config.persist_views {
        state.session_views.fetch_add(1, Ordering::SeqCst);
        return;
    }
    match state.store.load_stats().await {
        Ok(mut stats) => {
            stats.views += 1;
            if let Err(e) = state.store.save_stats(&stats, "Update view count").await {
                warn!(error = %e, "failed to persist view count");
            }
        }
        Err(e) => warn!(error = %e, "failed to load stats for view count"),
    }
}

pub async fn latest_digest(State(state): State<Arc<AppState>>) -> ApiResult {
    let archive = state.store.load_archive().await.map_err(store_error)?;
    count_view(&state).await;

    match latest_date(&archive) {
        Some(date) => Ok(Json(json!({ "date": date, "digest": archive[date] }))),
        None => Err(api_error(StatusCode::NOT_FOUND, "no digests generated yet")),
    }
}

pub async fn list_dates(State(state): State<Arc<AppState>>) -> ApiResult {
    let archive = state.store.load_archive().await.map_err(store_error)?;
    Ok(Json(json!({ "dates": sorted_dates_desc(&archive) })))
}

pub async fn digest_by_date(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> ApiResult {
    let archive = state.store.load_archive().await.map_err(store_error)?;
    match archive.get(&date) {
        Some(digest) => Ok(Json(json!({ "date": date, "digest": digest }))),
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("no digest for {}", date),
        )),
    }
}

pub async fn list_feeds(
    State(state): State<Arc<AppState>>,
    Query(auth): Query<AdminAuth>,
) -> ApiResult {
    authorize(&state, &auth.password)?;
    let feeds = state.store.load_feeds().await.map_err(store_error)?;
    Ok(Json(json!({ "feeds": feeds })))
}

pub async fn add_feed(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddFeedRequest>,
) -> ApiResult {
    authorize(&state, &request.password)?;
    if request.url.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "feed URL is empty"));
    }

    let mut feeds = state.store.load_feeds().await.map_err(store_error)?;
    // Deduplicate by exact string match.
    let added = !feeds.contains(&request.url);
    if added {
        feeds.push(request.url);
        state
            .store
            .save_feeds(&feeds, "Add new RSS feed")
            .await
            .map_err(store_error)?;
    }
    Ok(Json(json!({ "feeds": feeds, "added": added })))
}

/// Blocking pipeline trigger: the response arrives once collection,
/// generation and persistence have all finished.
pub async fn run_pipeline(
    State(state): State<Arc<AppState>>,
    Json(auth): Json<AdminAuth>,
) -> ApiResult {
    authorize(&state, &auth.password)?;
    match state.pipeline.run().await {
        Ok(report) => Ok(Json(serde_json::to_value(report).map_err(|e| {
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?)),
        Err(e) => Err(api_error(StatusCode::BAD_GATEWAY, e.to_string())),
    }
}

pub async fn view_stats(
    State(state): State<Arc<AppState>>,
    Query(auth): Query<AdminAuth>,
) -> ApiResult {
    authorize(&state, &auth.password)?;
    let stats = state.store.load_stats().await.map_err(store_error)?;
    let views = stats.views + state.session_views.load(Ordering::SeqCst);
    Ok(Json(json!({
        "views": views,
        "persisted": state.config.persist_views,
    })))
}
