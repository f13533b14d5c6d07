use crate::helpers::{dashboard, unreachable, MockApi};
use feeds::{fallback_events, fallback_movies, Feed, FeedsConfig};

#[tokio::test]
async fn snapshot_reports_failed_feeds_and_keeps_the_rest() {
    let mut upstream = MockApi::new();
    // weather has no key so only tides and movies reach upstream
    upstream.expect_get().times(2).returning(|_| Err(unreachable()));

    let snapshot = dashboard(&FeedsConfig::default(), upstream).snapshot().await;

    assert!(snapshot.weather.is_none());
    assert!(snapshot.tides.is_none());
    assert_eq!(snapshot.movies.unwrap().showtimes, fallback_movies());
    assert_eq!(snapshot.events.unwrap().upcoming, fallback_events());

    let failed: Vec<Feed> = snapshot.failed.iter().map(|failure| failure.feed).collect();
    assert_eq!(failed, vec![Feed::Weather, Feed::Tides]);
    assert_eq!(snapshot.failed[0].error, "Failed to fetch weather data");
    assert_eq!(snapshot.failed[1].message, "error sending request: connection refused");
}
