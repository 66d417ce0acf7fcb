use std::collections::BTreeMap;

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;

use crate::error::ContentStoreError;

/// Named query parameters, referenced as `$name` inside the query.
pub type QueryParams = BTreeMap<String, Value>;

#[automock]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Runs `query` and returns the `result` part of the response.
    /// A query that matches nothing yields `Value::Null` or an empty array.
    async fn fetch(&self, query: &str, params: &QueryParams) -> Result<Value, ContentStoreError>;
}
