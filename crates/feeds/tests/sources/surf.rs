use crate::helpers::{dashboard, MockApi};
use feeds::{Coordinates, FeedError, FeedsConfig, SurfVariant, UpstreamResponse};

const COORDINATES: Coordinates = Coordinates {
    lat: 21.276,
    lng: -157.822,
};

#[tokio::test]
async fn minimal_variant_reports_feet() {
    let mut config = FeedsConfig::default();
    config.surf.variant = SurfVariant::Minimal;
    let mut upstream = MockApi::new();
    upstream
        .expect_get()
        .withf(|request| request.query_value("hourly") == Some("wave_height"))
        .times(1)
        .returning(|_| {
            Ok(UpstreamResponse::ok(
                r#"{"hourly": {"time": ["1999-01-01T00:00"], "wave_height": [1.0]}}"#,
            ))
        });

    let record = dashboard(&config, upstream)
        .surf(COORDINATES)
        .await
        .unwrap();

    assert_eq!(record.time, "1999-01-01T00:00");
    let feet = record.wave_height.unwrap();
    assert!((feet - 3.28084).abs() <= 0.01);
    assert_eq!(record.swell_dir, Some(225.0));
}

#[tokio::test]
async fn full_variant_forwards_upstream_units() {
    let mut upstream = MockApi::new();
    upstream
        .expect_get()
        .withf(|request| {
            request.query_value("latitude") == Some("21.276")
                && request.query_value("longitude") == Some("-157.822")
                && request.query_value("length_unit") == Some("ft")
                && request.query_value("wind_speed_unit") == Some("kn")
        })
        .times(1)
        .returning(|_| {
            Ok(UpstreamResponse::ok(
                r#"{"hourly": {
                    "time": ["1999-01-01T00:00"],
                    "wave_height": [4.3],
                    "swell_wave_height": [3.1],
                    "swell_wave_direction": [205],
                    "swell_wave_period": [13.5],
                    "wind_speed_10m": [11.0],
                    "wind_direction_10m": [60]
                }}"#,
            ))
        });

    let record = dashboard(&FeedsConfig::default(), upstream)
        .surf(COORDINATES)
        .await
        .unwrap();

    assert_eq!(record.wave_height, Some(4.3));
    assert_eq!(record.swell_height, Some(3.1));
    assert_eq!(record.swell_period, Some(13.5));
    assert_eq!(record.wind_dir, Some(60.0));
}

#[tokio::test]
async fn upstream_failure_propagates() {
    let mut upstream = MockApi::new();
    upstream
        .expect_get()
        .times(1)
        .returning(|_| Ok(UpstreamResponse::new(502, "Bad Gateway")));

    let err = dashboard(&FeedsConfig::default(), upstream)
        .surf(COORDINATES)
        .await
        .unwrap_err();

    assert!(matches!(err, FeedError::Status { status: 502, .. }));
    assert_eq!(err.to_string(), "Open-Meteo responded with status: 502");
}
