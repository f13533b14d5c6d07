use crate::{FeedError, Upstream};
use async_trait::async_trait;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Feed {
    Weather,
    Tides,
    Movies,
    Events,
    Surf,
}

impl Feed {
    pub const ALL: [Feed; 5] = [
        Feed::Weather,
        Feed::Tides,
        Feed::Movies,
        Feed::Events,
        Feed::Surf,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Feed::Weather => "weather",
            Feed::Tides => "tides",
            Feed::Movies => "movies",
            Feed::Events => "events",
            Feed::Surf => "surf",
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Feed::Weather => "/api/weather",
            Feed::Tides => "/api/tides",
            Feed::Movies => "/api/movies",
            Feed::Events => "/api/events",
            Feed::Surf => "/api/surf",
        }
    }

    /// Message put in the `error` field when the feed endpoint fails.
    pub const fn error_message(self) -> &'static str {
        match self {
            Feed::Weather => "Failed to fetch weather data",
            Feed::Tides => "Failed to fetch tides data",
            Feed::Movies => "Failed to fetch movies data",
            Feed::Events => "Failed to fetch events data",
            Feed::Surf => "Surf data unavailable",
        }
    }

    /// How often the browser card polls this feed.
    pub const fn refresh_interval(self) -> Duration {
        match self {
            Feed::Weather => Duration::from_secs(15 * 60),
            Feed::Tides => Duration::from_secs(30 * 60),
            Feed::Movies => Duration::from_secs(24 * 60 * 60),
            Feed::Events => Duration::from_secs(6 * 60 * 60),
            Feed::Surf => Duration::from_secs(30 * 60),
        }
    }

    /// Window in which repeated browser requests for the feed are collapsed into one.
    pub const fn dedupe_window(self) -> Duration {
        match self {
            Feed::Weather | Feed::Tides => Duration::from_secs(60),
            Feed::Movies | Feed::Events => Duration::from_secs(5 * 60),
            Feed::Surf => Duration::ZERO,
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One upstream-backed feed: how to fetch and normalize it, and what to
/// serve instead when that fails.
#[async_trait]
pub trait FeedSource: Sync + Send {
    type Query: Sync + Send;
    type Record: Send;

    fn feed(&self) -> Feed;

    async fn fetch(
        &self,
        upstream: &dyn Upstream,
        query: &Self::Query,
    ) -> Result<Self::Record, FeedError>;

    /// Static record to serve in place of `err`, `None` to surface the error.
    fn fallback(&self, _err: &FeedError) -> Option<Self::Record> {
        None
    }
}

pub async fn fetch_feed<S>(
    source: &S,
    upstream: &dyn Upstream,
    query: &S::Query,
) -> Result<S::Record, FeedError>
where
    S: FeedSource + ?Sized,
{
    match source.fetch(upstream, query).await {
        Ok(record) => Ok(record),
        Err(err) => match source.fallback(&err) {
            Some(record) => {
                warn!("{} feed using fallback data: {}", source.feed(), err);
                Ok(record)
            }
            None => {
                error!("error fetching {} data: {}", source.feed(), err);
                Err(err)
            }
        },
    }
}
