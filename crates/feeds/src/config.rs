use crate::FeedError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::UtcOffset;

/// Offsets in use on real clocks, UTC-12 through UTC+14
const UTC_OFFSET_HOURS: std::ops::RangeInclusive<i8> = -12..=14;

/// Everything the feed sources need, handed to each source when it is built.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub http: HttpSettings,
    pub location: LocationSettings,
    pub weather: WeatherSettings,
    pub tides: TideSettings,
    pub movies: MovieSettings,
    pub events: EventSettings,
    pub surf: SurfSettings,
}

impl FeedsConfig {
    pub fn validate(&self) -> Result<(), FeedError> {
        self.location.validate()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per attempt, so the worst case is `timeout * (max_retries + 1)`
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings {
            timeout_secs: 10,
            max_retries: 1,
            user_agent: String::from("island-dashboard/0.1"),
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSettings {
    /// Hours east of UTC used for "today", local clock labels and tide times
    pub utc_offset_hours: i8,
}

impl Default for LocationSettings {
    fn default() -> Self {
        // Honolulu, no daylight saving
        LocationSettings {
            utc_offset_hours: -10,
        }
    }
}

impl LocationSettings {
    pub fn validate(&self) -> Result<(), FeedError> {
        if UTC_OFFSET_HOURS.contains(&self.utc_offset_hours) {
            return Ok(());
        }
        Err(FeedError::Config(format!(
            "location.utc_offset_hours must be between {} and {}, got {}",
            UTC_OFFSET_HOURS.start(),
            UTC_OFFSET_HOURS.end(),
            self.utc_offset_hours
        )))
    }

    pub fn utc_offset(&self) -> UtcOffset {
        match UtcOffset::from_hms(self.utc_offset_hours, 0, 0) {
            Ok(offset) => offset,
            Err(e) => {
                warn!(
                    "utc offset {}h is out of range, using UTC: {}",
                    self.utc_offset_hours, e
                );
                UtcOffset::UTC
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        WeatherSettings {
            api_key: None,
            base_url: String::from("https://api.openweathermap.org/data/2.5"),
            latitude: 21.3099,
            longitude: -157.8581,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TideSettings {
    pub base_url: String,
    pub station_id: String,
}

impl Default for TideSettings {
    fn default() -> Self {
        TideSettings {
            base_url: String::from("https://api.tidesandcurrents.noaa.gov/api/prod/datagetter"),
            // Honolulu Harbor
            station_id: String::from("1612340"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieSettings {
    pub theater_url: String,
    pub user_agent: String,
}

impl Default for MovieSettings {
    fn default() -> Self {
        MovieSettings {
            theater_url: String::from(
                "https://www.fandango.com/consolidated-theatres-ward-with-titan-luxe-aakha/theater-page",
            ),
            user_agent: String::from(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            ),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    pub token: Option<String>,
    pub base_url: String,
    pub address: String,
    pub within_miles: u32,
}

impl Default for EventSettings {
    fn default() -> Self {
        EventSettings {
            token: None,
            base_url: String::from("https://www.eventbriteapi.com/v3"),
            address: String::from("Honolulu,HI"),
            within_miles: 25,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfVariant {
    /// Wave height only; swell and wind are fixed trade-wind values
    Minimal,
    /// Swell and wind series requested from upstream in feet and knots
    #[default]
    Full,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfSettings {
    pub base_url: String,
    pub variant: SurfVariant,
}

impl Default for SurfSettings {
    fn default() -> Self {
        SurfSettings {
            base_url: String::from("https://marine-api.open-meteo.com/v1/marine"),
            variant: SurfVariant::Full,
        }
    }
}

/// Blank strings count as "not configured".
pub fn credential(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
