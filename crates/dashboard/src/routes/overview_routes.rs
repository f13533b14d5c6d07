use std::sync::Arc;

use axum::{extract::State, Json};
use feeds::{feed_info, DashboardSnapshot, FeedInfo};

use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = OK, description = "Weather, tides, movies and events in one response, failed feeds are listed in `failed`", body = DashboardSnapshot)
    ))]
pub async fn snapshot(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.dashboard.snapshot().await)
}

#[utoipa::path(
    get,
    path = "/api/feeds",
    responses(
        (status = OK, description = "Feed paths with the refresh interval and de-duplication window the UI uses", body = Vec<FeedInfo>)
    ))]
pub async fn list_feeds() -> Json<Vec<FeedInfo>> {
    Json(feed_info())
}
