use crate::{events, list_feeds, movies, routes, snapshot, surf, tides, weather, ErrorBody};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    http::Method,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use feeds::{Dashboard, Feed, FeedsConfig};
use log::info;
use std::{path::Path, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub ui_dir: String,
    pub dashboard: Arc<Dashboard>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::feed_routes::weather,
        routes::feed_routes::tides,
        routes::feed_routes::movies,
        routes::feed_routes::events,
        routes::feed_routes::surf,
        routes::overview_routes::snapshot,
        routes::overview_routes::list_feeds,
    ),
    components(
        schemas(
            ErrorBody,
            feeds::Feed,
            feeds::FeedInfo,
            feeds::FeedFailure,
            feeds::DashboardSnapshot,
            feeds::WeatherRecord,
            feeds::TideRecord,
            feeds::MovieRecord,
            feeds::EventRecord,
            feeds::SurfRecord,
        )
    ),
    tags(
        (name = "dashboard api", description = "weather, tides, showtimes, local events and surf conditions for the dashboard cards")
    )
)]
struct ApiDoc;

pub fn build_app_state(ui_dir: String, config: &FeedsConfig) -> Result<AppState, anyhow::Error> {
    let dashboard = Dashboard::new(config).map_err(|e| anyhow!("error setting up feeds: {}", e))?;

    Ok(AppState {
        ui_dir,
        dashboard: Arc::new(dashboard),
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let index = Path::new(&app_state.ui_dir).join("index.html");
    let serve_dir = ServeDir::new(&app_state.ui_dir).not_found_service(ServeFile::new(index));
    let cors = CorsLayer::new()
        // the dashboard api is read only
        .allow_methods([Method::GET])
        .allow_origin(Any);
    Router::new()
        .route(Feed::Weather.path(), get(weather))
        .route(Feed::Tides.path(), get(tides))
        .route(Feed::Movies.path(), get(movies))
        .route(Feed::Events.path(), get(events))
        .route(Feed::Surf.path(), get(surf))
        .route("/api/dashboard", get(snapshot))
        .route("/api/feeds", get(list_feeds))
        .layer(middleware::from_fn(log_request))
        .with_state(Arc::new(app_state))
        .merge(Scalar::with_url("/docs", api_docs))
        .fallback_service(serve_dir)
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
