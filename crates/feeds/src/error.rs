#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("{0}")]
    MissingCredential(String),
    #[error("{0}")]
    InvalidCredential(String),
    #[error("{upstream} responded with status: {status}")]
    Status { upstream: &'static str, status: u16 },
    #[error("error sending request: {0}")]
    Transport(String),
    #[error("error parsing upstream response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    NoData(String),
    #[error("invalid upstream value: {0}")]
    InvalidValue(String),
    #[error("error handling time value: {0}")]
    Time(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<time::error::Parse> for FeedError {
    fn from(value: time::error::Parse) -> Self {
        FeedError::Time(value.to_string())
    }
}

impl From<time::error::Format> for FeedError {
    fn from(value: time::error::Format) -> Self {
        FeedError::Time(value.to_string())
    }
}

impl From<time::error::ComponentRange> for FeedError {
    fn from(value: time::error::ComponentRange) -> Self {
        FeedError::Time(value.to_string())
    }
}
