use crate::helpers::{config_with_credentials, dashboard, unreachable, MockApi};
use feeds::{fallback_events, FeedsConfig, PriceType, UpstreamResponse};

#[tokio::test]
async fn missing_token_serves_fallback_without_calling_upstream() {
    let mut upstream = MockApi::new();
    upstream.expect_get().never();

    let record = dashboard(&FeedsConfig::default(), upstream)
        .events()
        .await
        .unwrap();

    assert_eq!(record.upcoming, fallback_events());
}

#[tokio::test]
async fn blank_token_counts_as_missing() {
    let mut config = FeedsConfig::default();
    config.events.token = Some(String::from("   "));
    let mut upstream = MockApi::new();
    upstream.expect_get().never();

    let record = dashboard(&config, upstream).events().await.unwrap();

    assert_eq!(record.upcoming, fallback_events());
}

#[tokio::test]
async fn unreachable_search_serves_fallback_events() {
    let mut upstream = MockApi::new();
    upstream.expect_get().times(1).returning(|_| Err(unreachable()));

    let record = dashboard(&config_with_credentials(), upstream)
        .events()
        .await
        .unwrap();

    assert_eq!(record.upcoming, fallback_events());
}

#[tokio::test]
async fn empty_search_serves_fallback_events() {
    let mut upstream = MockApi::new();
    upstream
        .expect_get()
        .times(1)
        .returning(|_| Ok(UpstreamResponse::ok(r#"{"events": []}"#)));

    let record = dashboard(&config_with_credentials(), upstream)
        .events()
        .await
        .unwrap();

    assert_eq!(record.upcoming, fallback_events());
}

#[tokio::test]
async fn search_results_are_mapped_for_display() {
    let mut upstream = MockApi::new();
    upstream
        .expect_get()
        .withf(|request| {
            request.url.ends_with("/events/search/")
                && request.bearer_token.as_deref() == Some("test-events-token")
                && request.query_value("location.address") == Some("Honolulu,HI")
                && request.query_value("location.within") == Some("25mi")
                && request.query_value("expand") == Some("venue")
                && request.query_value("sort_by") == Some("date")
        })
        .times(1)
        .returning(|_| {
            Ok(UpstreamResponse::ok(
                r#"{"events": [{
                    "name": {"text": "Aloha Friday Jam"},
                    "description": {"text": "Slack key guitar on the lawn"},
                    "start": {"local": "2024-06-21T17:30:00"},
                    "end": {"local": "2024-06-21T20:00:00"},
                    "venue": {"name": "Bishop Museum"},
                    "ticket_availability": {"minimum_ticket_price": {"major_value": 20}}
                }]}"#,
            ))
        });

    let record = dashboard(&config_with_credentials(), upstream)
        .events()
        .await
        .unwrap();

    assert_eq!(record.upcoming.len(), 1);
    let event = &record.upcoming[0];
    assert_eq!(event.title, "Aloha Friday Jam");
    assert_eq!(event.date, "JUN 21");
    assert_eq!(event.time, "5:30 PM - 8:00 PM");
    assert_eq!(event.venue, "Bishop Museum");
    assert_eq!(event.price, "$20");
    assert_eq!(event.price_type, PriceType::Paid);
}

#[tokio::test]
async fn malformed_event_is_skipped_not_the_whole_search() {
    let mut upstream = MockApi::new();
    upstream.expect_get().times(1).returning(|_| {
        Ok(UpstreamResponse::ok(
            r#"{"events": [
                {"name": {"text": "Lantern Floating"}, "start": {"local": "2024-05-27T18:00:00"}},
                {"name": {"text": "Date Pending"}, "start": null},
                {"name": {"text": "Call For Price"}, "start": {"local": "2024-05-28T18:00:00"},
                 "ticket_availability": {"minimum_ticket_price": {"major_value": "TBD"}}}
            ]}"#,
        ))
    });

    let record = dashboard(&config_with_credentials(), upstream)
        .events()
        .await
        .unwrap();

    assert_eq!(record.upcoming.len(), 1);
    assert_eq!(record.upcoming[0].title, "Lantern Floating");
    assert_eq!(record.upcoming[0].price_type, PriceType::Free);
}
