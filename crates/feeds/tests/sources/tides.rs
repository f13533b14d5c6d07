use crate::helpers::{dashboard, unreachable, MockApi};
use feeds::{FeedError, FeedsConfig, TideKind, TideStatus, UpstreamResponse, DEFAULT_LEVEL_FT};
use time::{macros::format_description, Duration, OffsetDateTime, UtcOffset};

fn station_time(at: OffsetDateTime) -> String {
    at.to_offset(UtcOffset::from_hms(-10, 0, 0).unwrap())
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap()
}

fn predictions() -> String {
    let now = OffsetDateTime::now_utc();
    format!(
        r#"{{"predictions": [
            {{"t": "{}", "v": "0.210", "type": "L"}},
            {{"t": "{}", "v": "1.904", "type": "H"}},
            {{"t": "{}", "v": "0.388", "type": "L"}}
        ]}}"#,
        station_time(now - Duration::hours(4)),
        station_time(now + Duration::minutes(150)),
        station_time(now + Duration::hours(9)),
    )
}

#[tokio::test]
async fn upcoming_tides_with_current_level() {
    let predictions = predictions();
    let mut upstream = MockApi::new();
    upstream
        .expect_get()
        .withf(|request| {
            request.query_value("product") == Some("predictions")
                && request.query_value("interval") == Some("hilo")
                && request.query_value("station") == Some("1612340")
                && request.query_value("datum") == Some("MLLW")
        })
        .times(1)
        .returning(move |_| Ok(UpstreamResponse::ok(predictions.clone())));
    upstream
        .expect_get()
        .withf(|request| request.query_value("product") == Some("water_level"))
        .times(1)
        .returning(|_| {
            Ok(UpstreamResponse::ok(
                r#"{"data": [{"t": "2024-06-15 07:00", "v": "0.512"}, {"t": "2024-06-15 07:06", "v": "0.734"}]}"#,
            ))
        });

    let record = dashboard(&FeedsConfig::default(), upstream)
        .tides()
        .await
        .unwrap();

    assert_eq!(record.current.status, TideStatus::Rising);
    assert_eq!(record.current.level, 0.7);
    assert_eq!(record.current.percentage, 18);
    assert_eq!(record.upcoming.len(), 2);
    assert_eq!(record.upcoming[0].kind, TideKind::High);
    assert_eq!(record.upcoming[0].height, 1.904);
    assert!(record.upcoming[0].time_label.starts_with("in 2h"));
    assert_eq!(record.upcoming[1].kind, TideKind::Low);
}

#[tokio::test]
async fn failed_water_level_uses_default() {
    let predictions = predictions();
    let mut upstream = MockApi::new();
    upstream
        .expect_get()
        .withf(|request| request.query_value("product") == Some("predictions"))
        .times(1)
        .returning(move |_| Ok(UpstreamResponse::ok(predictions.clone())));
    upstream
        .expect_get()
        .withf(|request| request.query_value("product") == Some("water_level"))
        .times(1)
        .returning(|_| Err(unreachable()));

    let record = dashboard(&FeedsConfig::default(), upstream)
        .tides()
        .await
        .unwrap();

    assert_eq!(record.current.level, DEFAULT_LEVEL_FT);
    assert_eq!(record.current.percentage, 50);
}

#[tokio::test]
async fn no_predictions_is_an_error() {
    let mut upstream = MockApi::new();
    upstream
        .expect_get()
        .times(1)
        .returning(|_| Ok(UpstreamResponse::ok(r#"{"error": {"message": "No data was found"}}"#)));

    let err = dashboard(&FeedsConfig::default(), upstream)
        .tides()
        .await
        .unwrap_err();

    assert!(matches!(err, FeedError::NoData(_)));
    assert_eq!(err.to_string(), "No tide predictions available");
}

#[tokio::test]
async fn station_errors_are_not_replaced_with_fallback() {
    let mut upstream = MockApi::new();
    upstream
        .expect_get()
        .times(1)
        .returning(|_| Ok(UpstreamResponse::new(500, "")));

    let err = dashboard(&FeedsConfig::default(), upstream)
        .tides()
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "NOAA API responded with status: 500");
}
