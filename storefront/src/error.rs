use interface::error::{ContentStoreError, DropContractError, ImageUrlError};
use metrics_utils::errors::MetricsError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum StorefrontError {
    #[error("Missing or invalid configuration: ({msg})")]
    ConfigurationError { msg: String },
    #[error("HTTP client error: {0}")]
    HttpClientError(String),
    #[error("Server error: {0}")]
    ServerError(String),
    #[error("Metrics error: {0}")]
    MetricsError(String),
    #[error("Content store error: {0}")]
    ContentStore(#[from] ContentStoreError),
    #[error("Image url error: {0}")]
    ImageUrl(#[from] ImageUrlError),
    #[error("Drop gateway error: {0}")]
    DropGateway(#[from] DropContractError),
}

impl From<reqwest::Error> for StorefrontError {
    fn from(err: reqwest::Error) -> Self {
        StorefrontError::HttpClientError(err.to_string())
    }
}

impl From<MetricsError> for StorefrontError {
    fn from(err: MetricsError) -> Self {
        StorefrontError::MetricsError(err.to_string())
    }
}

impl From<figment::Error> for StorefrontError {
    fn from(err: figment::Error) -> Self {
        StorefrontError::ConfigurationError {
            msg: err.to_string(),
        }
    }
}

impl From<url::ParseError> for StorefrontError {
    fn from(err: url::ParseError) -> Self {
        StorefrontError::ConfigurationError {
            msg: format!("invalid url: {}", err),
        }
    }
}
