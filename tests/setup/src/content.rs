use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use entities::models::Collection;
use interface::content_store::{ContentStore, QueryParams};
use interface::error::ContentStoreError;
use serde_json::Value;
use tokio::sync::RwLock;
use usecase::catalog::{collection_by_slug_query, collections_query, SLUG_PARAM};

/// Content store answering the two catalog queries from memory.
pub struct InMemoryContentStore {
    collections: RwLock<Vec<Collection>>,
    unavailable: AtomicBool,
    fetches: AtomicUsize,
}

impl InMemoryContentStore {
    pub fn new(collections: Vec<Collection>) -> Self {
        Self {
            collections: RwLock::new(collections),
            unavailable: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
        }
    }

    pub async fn insert(&self, collection: Collection) {
        self.collections.write().await.push(collection);
    }

    /// Every following fetch fails with a 503.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn fetch(&self, query: &str, params: &QueryParams) -> Result<Value, ContentStoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ContentStoreError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }

        let collections = self.collections.read().await;
        if query == collections_query() {
            return Ok(serde_json::to_value(&*collections)?);
        }
        if query == collection_by_slug_query() {
            let slug = params.get(SLUG_PARAM).and_then(Value::as_str);
            return match collections.iter().find(|c| Some(c.slug.current.as_str()) == slug) {
                Some(collection) => Ok(serde_json::to_value(collection)?),
                None => Ok(Value::Null),
            };
        }

        Err(ContentStoreError::Status {
            status: 400,
            body: format!("unsupported query: {}", query),
        })
    }
}
