use crate::{
    credential, Feed, FeedError, FeedSource, FeedsConfig, Upstream, UpstreamRequest,
    WeatherSettings,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::{macros::format_description, OffsetDateTime, UtcOffset};
use utoipa::ToSchema;

pub const MAX_FORECAST_DAYS: usize = 3;
/// The forecast series is 3-hourly, so every 8th sample is roughly a day apart
const SAMPLES_PER_DAY: usize = 8;
const HPA_TO_INHG: f64 = 0.02953;
const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecast>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub temp: i64,
    pub feels_like: i64,
    pub condition: String,
    pub humidity: i64,
    pub uv_index: i64,
    pub wind: String,
    pub pressure: String,
    pub icon: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: String,
    pub day: String,
    pub icon: String,
    pub high_temp: i64,
    pub low_temp: i64,
    pub condition: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CurrentResponse {
    pub main: CurrentReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub wind: Wind,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CurrentReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Condition {
    pub main: String,
    pub icon: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastSample>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ForecastSample {
    pub dt: i64,
    pub main: ForecastReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ForecastReadings {
    pub temp_max: f64,
    pub temp_min: f64,
}

/// 16 point compass label for a bearing in degrees.
pub fn wind_direction(degrees: f64) -> &'static str {
    let index = (degrees / 22.5).round() as i64;
    COMPASS[index.rem_euclid(COMPASS.len() as i64) as usize]
}

fn condition_parts(conditions: &[Condition]) -> (String, String) {
    conditions
        .first()
        .map(|condition| (condition.main.clone(), condition.icon.clone()))
        .unwrap_or_else(|| (String::from("Unknown"), String::new()))
}

pub fn current_conditions(current: &CurrentResponse) -> CurrentConditions {
    let (condition, icon) = condition_parts(&current.weather);
    CurrentConditions {
        temp: current.main.temp.round() as i64,
        feels_like: current.main.feels_like.round() as i64,
        condition,
        humidity: current.main.humidity.round() as i64,
        // not part of the basic current-conditions api
        uv_index: 0,
        wind: format!(
            "{} mph {}",
            current.wind.speed.round() as i64,
            wind_direction(current.wind.deg)
        ),
        pressure: format!("{:.2} in", current.main.pressure * HPA_TO_INHG),
        icon,
    }
}

pub fn daily_forecast(
    samples: &[ForecastSample],
    now: OffsetDateTime,
    offset: UtcOffset,
) -> Result<Vec<DailyForecast>, FeedError> {
    let today = now.to_offset(offset).date();
    let mut ordered: Vec<&ForecastSample> = samples.iter().collect();
    ordered.sort_by_key(|sample| sample.dt);

    ordered
        .into_iter()
        .step_by(SAMPLES_PER_DAY)
        .take(MAX_FORECAST_DAYS)
        .map(|sample| -> Result<DailyForecast, FeedError> {
            let date = OffsetDateTime::from_unix_timestamp(sample.dt)?
                .to_offset(offset)
                .date();
            let day = if date == today {
                String::from("Today")
            } else {
                date.format(format_description!("[weekday repr:short]"))?
            };
            let (condition, icon) = condition_parts(&sample.weather);
            Ok(DailyForecast {
                date: date.format(format_description!("[year]-[month]-[day]"))?,
                day,
                icon,
                high_temp: sample.main.temp_max.round() as i64,
                low_temp: sample.main.temp_min.round() as i64,
                condition,
            })
        })
        .collect()
}

pub struct WeatherSource {
    settings: WeatherSettings,
    offset: UtcOffset,
}

impl WeatherSource {
    pub fn new(config: &FeedsConfig) -> Self {
        WeatherSource {
            settings: config.weather.clone(),
            offset: config.location.utc_offset(),
        }
    }

    fn request(&self, endpoint: &str, api_key: &str) -> UpstreamRequest {
        UpstreamRequest::get(format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            endpoint
        ))
        .query("lat", self.settings.latitude)
        .query("lon", self.settings.longitude)
        .query("appid", api_key)
        .query("units", "imperial")
    }
}

#[async_trait]
impl FeedSource for WeatherSource {
    type Query = ();
    type Record = WeatherRecord;

    fn feed(&self) -> Feed {
        Feed::Weather
    }

    async fn fetch(
        &self,
        upstream: &dyn Upstream,
        _query: &(),
    ) -> Result<WeatherRecord, FeedError> {
        let api_key = credential(&self.settings.api_key).ok_or_else(|| {
            FeedError::MissingCredential(String::from(
                "OpenWeatherMap API key not configured. Please add OPENWEATHER_API_KEY to your environment.",
            ))
        })?;

        let current_response = upstream.get(self.request("weather", api_key)).await?;
        if current_response.status == 401 {
            return Err(FeedError::InvalidCredential(String::from(
                "The OpenWeatherMap API key is invalid. Please get a valid API key from openweathermap.org/api",
            )));
        }
        if !current_response.is_success() {
            return Err(FeedError::Status {
                upstream: "Weather API",
                status: current_response.status,
            });
        }
        let current: CurrentResponse = current_response.json()?;

        let forecast_response = upstream.get(self.request("forecast", api_key)).await?;
        if !forecast_response.is_success() {
            return Err(FeedError::Status {
                upstream: "Forecast API",
                status: forecast_response.status,
            });
        }
        let forecast: ForecastResponse = forecast_response.json()?;

        let now = OffsetDateTime::now_utc();
        Ok(WeatherRecord {
            current: current_conditions(&current),
            forecast: daily_forecast(&forecast.list, now, self.offset)?,
            last_updated: now,
        })
    }
}
