use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MetricsError {
    #[error("Metrics encoding failed: {0}")]
    Encode(String),
    #[error("Metrics server isn't started: {0}")]
    MetricsServer(String),
}
