use std::sync::{Arc, Once};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use dashboard::{app, setup_logger, AppState};
use feeds::{Dashboard, FeedError, FeedsConfig, Upstream, UpstreamRequest, UpstreamResponse};
use log::LevelFilter;
use mockall::mock;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
}

static INIT_LOGGER: Once = Once::new();
fn init_logger() {
    INIT_LOGGER.call_once(|| {
        setup_logger().level(LevelFilter::Debug).apply().unwrap();
    });
}

pub fn spawn_app(config: FeedsConfig, upstream: MockApi) -> TestApp {
    init_logger();
    let app_state = AppState {
        ui_dir: String::from("./ui"),
        dashboard: Arc::new(Dashboard::with_upstream(&config, Arc::new(upstream))),
    };
    let app = app(app_state);

    TestApp { app }
}

impl TestApp {
    pub async fn get<T: DeserializeOwned>(self, uri: &str) -> (StatusCode, T) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .unwrap();

        let response = self
            .app
            .oneshot(request)
            .await
            .expect("Failed to execute request.");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }
}

pub fn unreachable() -> FeedError {
    FeedError::Transport(String::from("connection refused"))
}

mock! {
    pub Api {}
    #[async_trait]
    impl Upstream for Api {
        async fn get(&self, request: UpstreamRequest) -> Result<UpstreamResponse, FeedError>;
    }
}
