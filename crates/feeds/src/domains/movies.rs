use crate::{
    fallback_movies, Feed, FeedError, FeedSource, FeedsConfig, MovieSettings, Upstream,
    UpstreamRequest,
};
use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

pub const MAX_MOVIES: usize = 6;
pub const MAX_SHOWTIMES: usize = 6;

const LISTING_SELECTOR: &str = ".movie-listing, .showtime-movie";
const TITLE_SELECTOR: &str = ".movie-title, h3, h2";
const RATING_SELECTOR: &str = ".rating, .mpaa";
const DURATION_SELECTOR: &str = ".duration, .runtime";
const GENRE_SELECTOR: &str = ".genre";
const TIME_SELECTOR: &str = ".showtime, .time";
const SHOWTIME_PATTERN: &str = r"\d+:\d+\s*(AM|PM|am|pm)";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub showtimes: Vec<Movie>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub title: String,
    pub rating: String,
    pub duration: String,
    pub genre: String,
    pub times: Vec<String>,
}

fn selector(css: &str) -> Result<Selector, FeedError> {
    Selector::parse(css)
        .map_err(|e| FeedError::InvalidValue(format!("selector '{}': {}", css, e)))
}

fn first_text(element: &ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|found| found.text().collect::<String>().trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Pulls movie listings out of a theater showtimes page.
pub fn scrape_showtimes(html: &str) -> Result<Vec<Movie>, FeedError> {
    let listing = selector(LISTING_SELECTOR)?;
    let title = selector(TITLE_SELECTOR)?;
    let rating = selector(RATING_SELECTOR)?;
    let duration = selector(DURATION_SELECTOR)?;
    let genre = selector(GENRE_SELECTOR)?;
    let time = selector(TIME_SELECTOR)?;
    let showtime = Regex::new(SHOWTIME_PATTERN)
        .map_err(|e| FeedError::InvalidValue(format!("showtime pattern: {}", e)))?;

    let document = Html::parse_document(html);
    let mut movies = vec![];
    for block in document.select(&listing) {
        let Some(movie_title) = first_text(&block, &title) else {
            continue;
        };
        let times: Vec<String> = block
            .select(&time)
            .map(|found| found.text().collect::<String>().trim().to_owned())
            .filter(|text| showtime.is_match(text))
            .take(MAX_SHOWTIMES)
            .collect();
        if times.is_empty() {
            continue;
        }

        movies.push(Movie {
            title: movie_title,
            rating: first_text(&block, &rating).unwrap_or_else(|| String::from("NR")),
            duration: first_text(&block, &duration).unwrap_or_else(|| String::from("120 min")),
            genre: first_text(&block, &genre).unwrap_or_else(|| String::from("Drama")),
            times,
        });
        if movies.len() == MAX_MOVIES {
            break;
        }
    }
    Ok(movies)
}

pub struct MovieSource {
    settings: MovieSettings,
}

impl MovieSource {
    pub fn new(config: &FeedsConfig) -> Self {
        MovieSource {
            settings: config.movies.clone(),
        }
    }
}

#[async_trait]
impl FeedSource for MovieSource {
    type Query = ();
    type Record = MovieRecord;

    fn feed(&self) -> Feed {
        Feed::Movies
    }

    async fn fetch(&self, upstream: &dyn Upstream, _query: &()) -> Result<MovieRecord, FeedError> {
        let request = UpstreamRequest::get(self.settings.theater_url.clone())
            .header("User-Agent", self.settings.user_agent.clone());
        let response = upstream.get(request).await?;
        if !response.is_success() {
            return Err(FeedError::Status {
                upstream: "Movie showtimes API",
                status: response.status,
            });
        }

        let showtimes = scrape_showtimes(&response.body)?;
        if showtimes.is_empty() {
            return Err(FeedError::NoData(String::from(
                "No showtimes found on theater page",
            )));
        }
        Ok(MovieRecord {
            showtimes,
            last_updated: OffsetDateTime::now_utc(),
        })
    }

    fn fallback(&self, _err: &FeedError) -> Option<MovieRecord> {
        Some(MovieRecord {
            showtimes: fallback_movies(),
            last_updated: OffsetDateTime::now_utc(),
        })
    }
}
