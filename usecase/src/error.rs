use interface::error::ContentStoreError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CatalogError {
    #[error("Collection {0} not found")]
    NotFound(String),
    #[error("Content store: {0}")]
    ContentStore(#[from] ContentStoreError),
    #[error("Unexpected collection document: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Decode(err.to_string())
    }
}
