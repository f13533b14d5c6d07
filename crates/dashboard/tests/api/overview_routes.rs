use crate::helpers::{spawn_app, unreachable, MockApi};
use axum::http::StatusCode;
use feeds::{DashboardSnapshot, Feed, FeedInfo, FeedsConfig};

#[tokio::test]
async fn snapshot_is_ok_with_partial_failures() {
    let mut upstream = MockApi::new();
    upstream.expect_get().times(2).returning(|_| Err(unreachable()));
    let test_app = spawn_app(FeedsConfig::default(), upstream);

    let (status, body): (StatusCode, DashboardSnapshot) = test_app.get("/api/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.weather.is_none());
    assert!(body.tides.is_none());
    assert!(body.movies.is_some());
    assert!(body.events.is_some());
    let failed: Vec<Feed> = body.failed.iter().map(|failure| failure.feed).collect();
    assert_eq!(failed, vec![Feed::Weather, Feed::Tides]);
}

#[tokio::test]
async fn feed_metadata_is_listed() {
    let mut upstream = MockApi::new();
    upstream.expect_get().never();
    let test_app = spawn_app(FeedsConfig::default(), upstream);

    let (status, body): (StatusCode, Vec<FeedInfo>) = test_app.get("/api/feeds").await;

    assert_eq!(status, StatusCode::OK);
    let paths: Vec<&str> = body.iter().map(|info| info.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["/api/weather", "/api/tides", "/api/movies", "/api/events", "/api/surf"]
    );
    assert_eq!(body[3].refresh_interval_secs, 6 * 60 * 60);
    assert_eq!(body[3].dedupe_window_secs, 5 * 60);
}
