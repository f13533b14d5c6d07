use crate::{
    Feed, FeedError, FeedSource, FeedsConfig, SurfSettings, SurfVariant, Upstream,
    UpstreamRequest,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::{macros::format_description, OffsetDateTime, UtcOffset};
use utoipa::ToSchema;

pub const FEET_PER_METER: f64 = 3.28084;
const FULL_HOURLY: &str = "wave_height,swell_wave_height,swell_wave_direction,swell_wave_period,wind_speed_10m,wind_direction_10m";

// fixed trade-wind conditions reported by the minimal variant
const MINIMAL_SWELL_DIR: f64 = 225.0;
const MINIMAL_SWELL_PERIOD: f64 = 8.0;
const MINIMAL_WIND_SPEED: f64 = 15.0;
const MINIMAL_WIND_DIR: f64 = 70.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurfRecord {
    /// Hourly sample timestamp as reported upstream, `2024-06-15T18:00`
    pub time: String,
    pub wave_height: Option<f64>,
    pub swell_height: Option<f64>,
    pub swell_dir: Option<f64>,
    pub swell_period: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_dir: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MarineResponse {
    pub hourly: HourlySeries,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub wave_height: Vec<Option<f64>>,
    pub swell_wave_height: Vec<Option<f64>>,
    pub swell_wave_direction: Vec<Option<f64>>,
    pub swell_wave_period: Vec<Option<f64>>,
    pub wind_speed_10m: Vec<Option<f64>>,
    pub wind_direction_10m: Vec<Option<f64>>,
}

fn sample(series: &[Option<f64>], index: usize) -> Option<f64> {
    series.get(index).copied().flatten()
}

pub fn meters_to_feet(meters: f64) -> f64 {
    (meters * FEET_PER_METER * 100.0).round() / 100.0
}

/// Hourly key for `now` in the upstream series format.
pub fn current_hour_key(now: OffsetDateTime) -> Result<String, FeedError> {
    Ok(now
        .to_offset(UtcOffset::UTC)
        .format(format_description!("[year]-[month]-[day]T[hour]:00"))?)
}

pub fn select_hour(times: &[String], hour_key: &str) -> usize {
    times.iter().position(|time| time == hour_key).unwrap_or(0)
}

pub fn surf_conditions(
    hourly: &HourlySeries,
    variant: SurfVariant,
    now: OffsetDateTime,
) -> Result<SurfRecord, FeedError> {
    if hourly.time.is_empty() {
        return Err(FeedError::NoData(String::from("No marine forecast available")));
    }
    let index = select_hour(&hourly.time, &current_hour_key(now)?);
    let time = hourly.time[index].clone();

    Ok(match variant {
        SurfVariant::Full => SurfRecord {
            time,
            wave_height: sample(&hourly.wave_height, index),
            swell_height: sample(&hourly.swell_wave_height, index),
            swell_dir: sample(&hourly.swell_wave_direction, index),
            swell_period: sample(&hourly.swell_wave_period, index),
            wind_speed: sample(&hourly.wind_speed_10m, index),
            wind_dir: sample(&hourly.wind_direction_10m, index),
        },
        SurfVariant::Minimal => {
            let wave_height = meters_to_feet(sample(&hourly.wave_height, index).unwrap_or(0.0));
            SurfRecord {
                time,
                wave_height: Some(wave_height),
                swell_height: Some(wave_height),
                swell_dir: Some(MINIMAL_SWELL_DIR),
                swell_period: Some(MINIMAL_SWELL_PERIOD),
                wind_speed: Some(MINIMAL_WIND_SPEED),
                wind_dir: Some(MINIMAL_WIND_DIR),
            }
        }
    })
}

pub struct SurfSource {
    settings: SurfSettings,
}

impl SurfSource {
    pub fn new(config: &FeedsConfig) -> Self {
        SurfSource {
            settings: config.surf.clone(),
        }
    }

    pub fn request(&self, coordinates: &Coordinates) -> UpstreamRequest {
        let request = UpstreamRequest::get(self.settings.base_url.clone())
            .query("latitude", coordinates.lat)
            .query("longitude", coordinates.lng);
        match self.settings.variant {
            SurfVariant::Full => request
                .query("hourly", FULL_HOURLY)
                .query("length_unit", "ft")
                .query("wind_speed_unit", "kn"),
            SurfVariant::Minimal => request.query("hourly", "wave_height"),
        }
    }
}

#[async_trait]
impl FeedSource for SurfSource {
    type Query = Coordinates;
    type Record = SurfRecord;

    fn feed(&self) -> Feed {
        Feed::Surf
    }

    async fn fetch(
        &self,
        upstream: &dyn Upstream,
        coordinates: &Coordinates,
    ) -> Result<SurfRecord, FeedError> {
        let response = upstream.get(self.request(coordinates)).await?;
        if !response.is_success() {
            return Err(FeedError::Status {
                upstream: "Open-Meteo",
                status: response.status,
            });
        }
        let marine: MarineResponse = response.json()?;
        surf_conditions(&marine.hourly, self.settings.variant, OffsetDateTime::now_utc())
    }
}
