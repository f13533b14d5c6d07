use crate::{Feed, FeedError, FeedSource, FeedsConfig, TideSettings, Upstream, UpstreamRequest};
use async_trait::async_trait;
use log::warn;
use serde::{Deserialize, Serialize};
use time::{
    macros::format_description, Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset,
};
use utoipa::ToSchema;

pub const MAX_UPCOMING_TIDES: usize = 4;
/// Level used when the water level station has no recent reading
pub const DEFAULT_LEVEL_FT: f64 = 2.0;
/// Tide card gauge spans 0 to 4 ft
const GAUGE_RANGE_FT: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TideStatus {
    Rising,
    Falling,
    High,
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TideKind {
    High,
    Low,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TideRecord {
    pub current: CurrentTide,
    pub upcoming: Vec<TideEvent>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTide {
    pub status: TideStatus,
    pub level: f64,
    pub percentage: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TideEvent {
    #[serde(rename = "type")]
    pub kind: TideKind,
    pub time: String,
    pub time_label: String,
    pub height: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PredictionsResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Prediction {
    /// Station local time, `2024-06-15 05:32`
    pub t: String,
    pub v: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WaterLevelResponse {
    #[serde(default)]
    pub data: Vec<WaterLevelSample>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WaterLevelSample {
    pub v: String,
}

pub fn tide_percentage(level_ft: f64) -> u8 {
    let percentage = (level_ft / GAUGE_RANGE_FT * 100.0).clamp(0.0, 100.0);
    if percentage.is_nan() {
        return 0;
    }
    percentage.round() as u8
}

pub fn relative_label(until: Duration) -> String {
    let minutes = until.whole_minutes();
    let hours = minutes / 60;
    if hours < 1 {
        format!("in {}m", minutes)
    } else if hours < 24 {
        format!("in {}h {}m", hours, minutes % 60)
    } else {
        String::from("tomorrow")
    }
}

pub fn clock_label(at: OffsetDateTime) -> Result<String, FeedError> {
    Ok(at.format(format_description!(
        "[hour repr:12 padding:none]:[minute] [period]"
    ))?)
}

fn parse_station_time(value: &str, offset: UtcOffset) -> Result<OffsetDateTime, FeedError> {
    let local = PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
    )?;
    Ok(local.assume_offset(offset))
}

fn parse_height(value: &str) -> Result<f64, FeedError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| FeedError::InvalidValue(format!("tide height '{}': {}", value, e)))
}

pub fn normalize_tides(
    predictions: &[Prediction],
    level_ft: Option<f64>,
    now: OffsetDateTime,
    offset: UtcOffset,
) -> Result<TideRecord, FeedError> {
    if predictions.is_empty() {
        return Err(FeedError::NoData(String::from(
            "No tide predictions available",
        )));
    }

    let mut events = predictions
        .iter()
        .map(|prediction| {
            Ok((
                parse_station_time(&prediction.t, offset)?,
                prediction.kind.starts_with('H'),
                parse_height(&prediction.v)?,
            ))
        })
        .collect::<Result<Vec<(OffsetDateTime, bool, f64)>, FeedError>>()?;
    events.sort_by_key(|(at, _, _)| *at);

    // at the very end of the window nothing is ahead of us, show the window as is
    let first_upcoming = events
        .iter()
        .position(|(at, _, _)| *at >= now)
        .unwrap_or(0);
    let upcoming = &events[first_upcoming..];

    let status = match upcoming.first() {
        Some((_, true, _)) => TideStatus::Rising,
        _ => TideStatus::Falling,
    };
    let level = level_ft.unwrap_or(DEFAULT_LEVEL_FT);

    let upcoming = upcoming
        .iter()
        .take(MAX_UPCOMING_TIDES)
        .map(|(at, is_high, height)| {
            Ok(TideEvent {
                kind: if *is_high {
                    TideKind::High
                } else {
                    TideKind::Low
                },
                time: clock_label(*at)?,
                time_label: relative_label(*at - now),
                height: *height,
            })
        })
        .collect::<Result<Vec<TideEvent>, FeedError>>()?;

    Ok(TideRecord {
        current: CurrentTide {
            status,
            level: (level * 10.0).round() / 10.0,
            percentage: tide_percentage(level),
        },
        upcoming,
        last_updated: now,
    })
}

pub struct TideSource {
    settings: TideSettings,
    offset: UtcOffset,
}

impl TideSource {
    pub fn new(config: &FeedsConfig) -> Self {
        TideSource {
            settings: config.tides.clone(),
            offset: config.location.utc_offset(),
        }
    }

    fn request(&self, product: &str, begin: Date, end: Date) -> Result<UpstreamRequest, FeedError> {
        let date_format = format_description!("[year][month][day]");
        Ok(UpstreamRequest::get(self.settings.base_url.clone())
            .query("product", product)
            .query("application", "NOS.COOPS.TAC.WL")
            .query("begin_date", begin.format(date_format)?)
            .query("end_date", end.format(date_format)?)
            .query("datum", "MLLW")
            .query("station", &self.settings.station_id)
            .query("time_zone", "lst_ldt")
            .query("units", "english")
            .query("format", "json"))
    }

    async fn current_level(&self, upstream: &dyn Upstream, today: Date) -> Option<f64> {
        let request = match self.request("water_level", today, today) {
            Ok(request) => request,
            Err(e) => {
                warn!("error building water level request: {}", e);
                return None;
            }
        };
        let response = match upstream.get(request).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                warn!("water level api responded with status: {}", response.status);
                return None;
            }
            Err(e) => {
                warn!("error requesting water level: {}", e);
                return None;
            }
        };
        let levels: WaterLevelResponse = match response.json() {
            Ok(levels) => levels,
            Err(e) => {
                warn!("error parsing water level: {}", e);
                return None;
            }
        };
        levels
            .data
            .last()
            .and_then(|sample| sample.v.trim().parse::<f64>().ok())
    }
}

#[async_trait]
impl FeedSource for TideSource {
    type Query = ();
    type Record = TideRecord;

    fn feed(&self) -> Feed {
        Feed::Tides
    }

    async fn fetch(&self, upstream: &dyn Upstream, _query: &()) -> Result<TideRecord, FeedError> {
        let now = OffsetDateTime::now_utc();
        let today = now.to_offset(self.offset).date();
        let tomorrow = today
            .next_day()
            .ok_or_else(|| FeedError::Time(String::from("no day after today")))?;

        let request = self
            .request("predictions", today, tomorrow)?
            .query("interval", "hilo");
        let response = upstream.get(request).await?;
        if !response.is_success() {
            return Err(FeedError::Status {
                upstream: "NOAA API",
                status: response.status,
            });
        }
        let predictions: PredictionsResponse = response.json()?;
        if predictions.predictions.is_empty() {
            return Err(FeedError::NoData(String::from(
                "No tide predictions available",
            )));
        }

        let level = self.current_level(upstream, today).await;
        normalize_tides(&predictions.predictions, level, now, self.offset)
    }
}
