use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("request to insights API failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("no insight available for {ecosystem}/{name}@{version}")]
    NotFound {
        ecosystem: String,
        name: String,
        version: String,
    },
    #[error("insights API rate limited the request")]
    RateLimited,
    #[error("insights API returned an error: {0}")]
    Api(String),
    #[error("failed to deserialize insights API response: {0}")]
    Deserialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InsightsError>;
