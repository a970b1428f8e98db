use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlatfeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Push platform error: {0}")]
    Platform(String),

    #[error("Subscription registration failed: {0}")]
    Registration(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FlatfeedError>;
