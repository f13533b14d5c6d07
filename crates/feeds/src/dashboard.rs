use crate::{
    fetch_feed, Coordinates, EventRecord, EventSource, Feed, FeedError, FeedsConfig,
    HttpUpstream, MovieRecord, MovieSource, SurfRecord, SurfSource, TideRecord, TideSource,
    Upstream, WeatherRecord, WeatherSource,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Every card feed in one response; a failed feed is `null` and listed in `failed`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub weather: Option<WeatherRecord>,
    pub tides: Option<TideRecord>,
    pub movies: Option<MovieRecord>,
    pub events: Option<EventRecord>,
    pub failed: Vec<FeedFailure>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedFailure {
    pub feed: Feed,
    pub error: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedInfo {
    pub feed: Feed,
    pub path: String,
    pub refresh_interval_secs: u64,
    pub dedupe_window_secs: u64,
}

impl From<Feed> for FeedInfo {
    fn from(feed: Feed) -> Self {
        FeedInfo {
            feed,
            path: feed.path().to_owned(),
            refresh_interval_secs: feed.refresh_interval().as_secs(),
            dedupe_window_secs: feed.dedupe_window().as_secs(),
        }
    }
}

pub fn feed_info() -> Vec<FeedInfo> {
    Feed::ALL.into_iter().map(FeedInfo::from).collect()
}

fn settle<T>(feed: Feed, result: Result<T, FeedError>, failed: &mut Vec<FeedFailure>) -> Option<T> {
    match result {
        Ok(record) => Some(record),
        Err(err) => {
            failed.push(FeedFailure {
                feed,
                error: feed.error_message().to_owned(),
                message: err.to_string(),
            });
            None
        }
    }
}

/// All feed sources sharing one upstream transport.
pub struct Dashboard {
    upstream: Arc<dyn Upstream>,
    weather: WeatherSource,
    tides: TideSource,
    movies: MovieSource,
    events: EventSource,
    surf: SurfSource,
}

impl Dashboard {
    pub fn new(config: &FeedsConfig) -> Result<Self, FeedError> {
        config.validate()?;
        let upstream = HttpUpstream::new(&config.http)?;
        Ok(Self::with_upstream(config, Arc::new(upstream)))
    }

    pub fn with_upstream(config: &FeedsConfig, upstream: Arc<dyn Upstream>) -> Self {
        Dashboard {
            upstream,
            weather: WeatherSource::new(config),
            tides: TideSource::new(config),
            movies: MovieSource::new(config),
            events: EventSource::new(config),
            surf: SurfSource::new(config),
        }
    }

    pub async fn weather(&self) -> Result<WeatherRecord, FeedError> {
        fetch_feed(&self.weather, self.upstream.as_ref(), &()).await
    }

    pub async fn tides(&self) -> Result<TideRecord, FeedError> {
        fetch_feed(&self.tides, self.upstream.as_ref(), &()).await
    }

    pub async fn movies(&self) -> Result<MovieRecord, FeedError> {
        fetch_feed(&self.movies, self.upstream.as_ref(), &()).await
    }

    pub async fn events(&self) -> Result<EventRecord, FeedError> {
        fetch_feed(&self.events, self.upstream.as_ref(), &()).await
    }

    pub async fn surf(&self, coordinates: Coordinates) -> Result<SurfRecord, FeedError> {
        fetch_feed(&self.surf, self.upstream.as_ref(), &coordinates).await
    }

    /// Fetches the four card feeds concurrently.
    pub async fn snapshot(&self) -> DashboardSnapshot {
        let (weather, tides, movies, events) =
            futures::join!(self.weather(), self.tides(), self.movies(), self.events());

        let mut failed = vec![];
        DashboardSnapshot {
            weather: settle(Feed::Weather, weather, &mut failed),
            tides: settle(Feed::Tides, tides, &mut failed),
            movies: settle(Feed::Movies, movies, &mut failed),
            events: settle(Feed::Events, events, &mut failed),
            failed,
        }
    }
}
