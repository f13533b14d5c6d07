use crate::{FeedError, HttpSettings};
use async_trait::async_trait;
use log::debug;
use regex::Regex;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

/// A single GET against a third-party API.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub bearer_token: Option<String>,
}

impl UpstreamRequest {
    pub fn get(url: impl Into<String>) -> Self {
        UpstreamRequest {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_owned(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_owned(), value.into()));
        self
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        UpstreamResponse {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FeedError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Transport every feed source goes through, swapped for a mock in tests.
#[async_trait]
pub trait Upstream: Sync + Send {
    async fn get(&self, request: UpstreamRequest) -> Result<UpstreamResponse, FeedError>;
}

static URL_QUERY: OnceLock<Option<Regex>> = OnceLock::new();

/// Drops the query string from any url in `message`, query params carry api keys.
pub fn redact_urls(message: &str) -> String {
    let pattern = URL_QUERY.get_or_init(|| Regex::new(r"(https?://[^\s?)]*)\?[^\s)]*").ok());
    match pattern {
        Some(pattern) => pattern.replace_all(message, "$1").into_owned(),
        None => String::from("upstream request failed"),
    }
}

fn transport_error(err: reqwest_middleware::Error) -> FeedError {
    let message = match err {
        reqwest_middleware::Error::Reqwest(e) => e.without_url().to_string(),
        reqwest_middleware::Error::Middleware(e) => format!("{:#}", e),
    };
    FeedError::Transport(redact_urls(&message))
}

pub struct HttpUpstream {
    client: ClientWithMiddleware,
}

impl HttpUpstream {
    pub fn new(settings: &HttpSettings) -> Result<Self, FeedError> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(settings.max_retries);
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout())
            .build()
            .map_err(|e| FeedError::Transport(format!("error building http client: {}", e)))?;
        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        Ok(HttpUpstream { client })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get(&self, request: UpstreamRequest) -> Result<UpstreamResponse, FeedError> {
        // url only, never the query
        debug!("requesting: {}", request.url);
        let mut builder = self.client.get(&request.url).query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| {
                FeedError::Transport(redact_urls(&format!(
                    "error reading body of request: {}",
                    e.without_url()
                )))
            })?;
        debug!("response from {}: {}", request.url, status);
        Ok(UpstreamResponse { status, body })
    }
}
