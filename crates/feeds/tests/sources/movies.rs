use crate::helpers::{dashboard, unreachable, MockApi};
use feeds::{fallback_movies, FeedsConfig, UpstreamResponse};

#[tokio::test]
async fn unreachable_theater_serves_fallback_movies() {
    let mut upstream = MockApi::new();
    upstream.expect_get().times(1).returning(|_| Err(unreachable()));

    let record = dashboard(&FeedsConfig::default(), upstream)
        .movies()
        .await
        .unwrap();

    assert_eq!(record.showtimes, fallback_movies());
}

#[tokio::test]
async fn page_without_listings_serves_fallback_movies() {
    let mut upstream = MockApi::new();
    upstream
        .expect_get()
        .times(1)
        .returning(|_| Ok(UpstreamResponse::ok("<html><body></body></html>")));

    let record = dashboard(&FeedsConfig::default(), upstream)
        .movies()
        .await
        .unwrap();

    assert_eq!(record.showtimes, fallback_movies());
}

#[tokio::test]
async fn blocked_theater_page_serves_fallback_movies() {
    let mut upstream = MockApi::new();
    upstream
        .expect_get()
        .times(1)
        .returning(|_| Ok(UpstreamResponse::new(403, "Forbidden")));

    let record = dashboard(&FeedsConfig::default(), upstream)
        .movies()
        .await
        .unwrap();

    assert_eq!(record.showtimes, fallback_movies());
}

#[tokio::test]
async fn scraped_movies_are_served() {
    let config = FeedsConfig::default();
    let user_agent = config.movies.user_agent.clone();
    let mut upstream = MockApi::new();
    upstream
        .expect_get()
        .withf(move |request| {
            request
                .headers
                .iter()
                .any(|(name, value)| name == "User-Agent" && *value == user_agent)
        })
        .times(1)
        .returning(|_| {
            Ok(UpstreamResponse::ok(
                r#"<div class="movie-listing"><h3>Wicked</h3><span class="mpaa">PG</span><span class="time">6:40 PM</span></div>"#,
            ))
        });

    let record = dashboard(&config, upstream).movies().await.unwrap();

    assert_eq!(record.showtimes.len(), 1);
    assert_eq!(record.showtimes[0].title, "Wicked");
    assert_eq!(record.showtimes[0].rating, "PG");
    assert_eq!(record.showtimes[0].times, vec![String::from("6:40 PM")]);
}
