use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use feeds::{
    Coordinates, EventRecord, Feed, MovieRecord, SurfRecord, TideRecord, WeatherRecord,
};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::{AppError, AppState, ErrorBody};

#[utoipa::path(
    get,
    path = "/api/weather",
    responses(
        (status = OK, description = "Current conditions and a three day forecast", body = WeatherRecord),
        (status = INTERNAL_SERVER_ERROR, description = "Missing or rejected api key, or the weather api failed", body = ErrorBody)
    ))]
pub async fn weather(State(state): State<Arc<AppState>>) -> Result<Json<WeatherRecord>, AppError> {
    let record = state
        .dashboard
        .weather()
        .await
        .map_err(AppError::feed(Feed::Weather))?;

    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/api/tides",
    responses(
        (status = OK, description = "Current tide level and the next high and low tides", body = TideRecord),
        (status = INTERNAL_SERVER_ERROR, description = "Tide station data unavailable", body = ErrorBody)
    ))]
pub async fn tides(State(state): State<Arc<AppState>>) -> Result<Json<TideRecord>, AppError> {
    let record = state
        .dashboard
        .tides()
        .await
        .map_err(AppError::feed(Feed::Tides))?;

    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/api/movies",
    responses(
        (status = OK, description = "Today's showtimes, a static list when the theater page is unavailable", body = MovieRecord),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to build showtimes", body = ErrorBody)
    ))]
pub async fn movies(State(state): State<Arc<AppState>>) -> Result<Json<MovieRecord>, AppError> {
    let record = state
        .dashboard
        .movies()
        .await
        .map_err(AppError::feed(Feed::Movies))?;

    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = OK, description = "Upcoming local events, a static list without an events token", body = EventRecord),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to build events", body = ErrorBody)
    ))]
pub async fn events(State(state): State<Arc<AppState>>) -> Result<Json<EventRecord>, AppError> {
    let record = state
        .dashboard
        .events()
        .await
        .map_err(AppError::feed(Feed::Events))?;

    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/api/surf",
    params(
        SurfRequest
    ),
    responses(
        (status = OK, description = "Marine conditions for the current hour", body = SurfRecord),
        (status = BAD_REQUEST, description = "lat or lng missing or not numbers", body = ErrorBody),
        (status = BAD_GATEWAY, description = "Marine api failed", body = ErrorBody)
    ))]
pub async fn surf(
    State(state): State<Arc<AppState>>,
    Query(req): Query<SurfRequest>,
) -> Result<Json<SurfRecord>, AppError> {
    let coordinates = req.coordinates()?;
    let record = state
        .dashboard
        .surf(coordinates)
        .await
        .map_err(AppError::feed(Feed::Surf))?;

    Ok(Json(record))
}

/// Kept as text so a missing value and a malformed one get different messages.
#[derive(Clone, Debug, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SurfRequest {
    /// Latitude in decimal degrees
    pub lat: Option<String>,
    /// Longitude in decimal degrees
    pub lng: Option<String>,
}

impl SurfRequest {
    pub fn coordinates(&self) -> Result<Coordinates, AppError> {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };
        let (Some(lat), Some(lng)) = (present(&self.lat), present(&self.lng)) else {
            return Err(AppError::Request(String::from("lat & lng are required")));
        };

        match (lat.parse::<f64>(), lng.parse::<f64>()) {
            (Ok(lat), Ok(lng)) if lat.is_finite() && lng.is_finite() => {
                Ok(Coordinates { lat, lng })
            }
            _ => Err(AppError::Request(String::from("lat & lng must be numbers"))),
        }
    }
}
