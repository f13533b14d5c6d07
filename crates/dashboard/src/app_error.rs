use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use feeds::{Feed, FeedError};
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Request(String),
    #[error("Failed to fetch {feed} data: {source}")]
    Feed {
        feed: Feed,
        #[source]
        source: FeedError,
    },
}

impl AppError {
    /// Wraps a failed fetch of `feed`, for use with `map_err`.
    pub fn feed(feed: Feed) -> impl FnOnce(FeedError) -> AppError {
        move |source| AppError::Feed { feed, source }
    }
}

/// Body of every error response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("error handling request: {}", self);

        let (status, body) = match self {
            AppError::Request(error) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    message: None,
                },
            ),
            AppError::Feed { feed, source } => {
                let status = match feed {
                    Feed::Surf => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (
                    status,
                    ErrorBody {
                        error: feed.error_message().to_owned(),
                        message: Some(source.to_string()),
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
