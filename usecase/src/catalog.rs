use std::sync::Arc;

use entities::models::Collection;
use interface::content_store::{ContentStore, QueryParams};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CatalogError;

/// Fields fetched for every collection, with the creator reference resolved inline.
pub const COLLECTION_PROJECTION: &str = r#"{
    _id,
    title,
    address,
    description,
    nftCollectionName,
    mainImage{
        asset
    },
    previewImage{
        asset
    },
    slug{
        current
    },
    creator->{
        _id,
        name,
        address,
        slug{
            current
        }
    }
}"#;

/// Name of the query parameter holding the requested slug.
pub const SLUG_PARAM: &str = "id";

pub fn collections_query() -> String {
    format!(r#"*[_type == "collection"]{}"#, COLLECTION_PROJECTION)
}

pub fn collection_by_slug_query() -> String {
    format!(
        r#"*[_type == "collection" && slug.current == ${}][0]{}"#,
        SLUG_PARAM, COLLECTION_PROJECTION
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogPage {
    List(Vec<Collection>),
    Detail(Box<Collection>),
}

pub struct CatalogLoader<C: ContentStore + ?Sized> {
    content_store: Arc<C>,
}

impl<C: ContentStore + ?Sized> CatalogLoader<C> {
    pub fn new(content_store: Arc<C>) -> Self {
        Self { content_store }
    }

    /// Listing without a slug, a single collection otherwise.
    pub async fn load(&self, slug: Option<&str>) -> Result<CatalogPage, CatalogError> {
        match slug {
            None => self.load_collections().await.map(CatalogPage::List),
            Some(slug) => self
                .load_collection(slug)
                .await
                .map(|collection| CatalogPage::Detail(Box::new(collection))),
        }
    }

    pub async fn load_collections(&self) -> Result<Vec<Collection>, CatalogError> {
        let result = self
            .content_store
            .fetch(&collections_query(), &QueryParams::new())
            .await?;

        let collections = match result {
            Value::Null => Vec::new(),
            value => serde_json::from_value::<Vec<Collection>>(value)?,
        };
        debug!("Loaded {} collections", collections.len());

        Ok(collections)
    }

    pub async fn load_collection(&self, slug: &str) -> Result<Collection, CatalogError> {
        let mut params = QueryParams::new();
        params.insert(SLUG_PARAM.to_string(), Value::String(slug.to_string()));

        let result = self
            .content_store
            .fetch(&collection_by_slug_query(), &params)
            .await?;
        if result.is_null() {
            debug!("Collection {} not found", slug);
            return Err(CatalogError::NotFound(slug.to_string()));
        }

        let collection: Collection = serde_json::from_value(result)?;
        if collection.slug.current != slug {
            warn!(
                "Content store returned collection {} for slug {}",
                collection.slug.current, slug
            );
            return Err(CatalogError::NotFound(slug.to_string()));
        }

        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interface::content_store::MockContentStore;
    use interface::error::ContentStoreError;
    use mockall::predicate::*;
    use serde_json::json;

    fn apes_document() -> Value {
        json!({
            "_id": "collection-apes",
            "title": "Ape Club",
            "address": "0xAbc0000000000000000000000000000000000001",
            "description": "Apes together",
            "nftCollectionName": "Ape Club Drop",
            "mainImage": { "asset": { "_ref": "image-main-600x800-png", "_type": "reference" } },
            "previewImage": { "asset": { "_ref": "image-preview-300x300-jpg", "_type": "reference" } },
            "slug": { "current": "apes" },
            "creator": { "_id": "creator-1", "name": "Papa", "address": "0xCreator", "slug": { "current": "papa" } }
        })
    }

    #[test]
    fn test_queries_shape() {
        let list = collections_query();
        assert!(list.starts_with(r#"*[_type == "collection"]{"#));
        assert!(list.contains("creator->{"));
        assert!(list.contains("nftCollectionName"));

        let detail = collection_by_slug_query();
        assert!(detail.starts_with(r#"*[_type == "collection" && slug.current == $id][0]{"#));
        assert!(detail.contains("previewImage{"));
    }

    #[tokio::test]
    async fn test_load_collections() {
        let mut store = MockContentStore::new();
        store
            .expect_fetch()
            .with(eq(collections_query()), eq(QueryParams::new()))
            .times(1)
            .returning(|_, _| Ok(Value::Array(vec![apes_document()])));
        let loader = CatalogLoader::new(Arc::new(store));

        let collections = loader.load_collections().await.unwrap();

        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].title.as_deref(), Some("Ape Club"));
    }

    #[tokio::test]
    async fn test_load_collections_from_empty_store() {
        let mut store = MockContentStore::new();
        store
            .expect_fetch()
            .times(1)
            .returning(|_, _| Ok(Value::Array(vec![])));
        let loader = CatalogLoader::new(Arc::new(store));

        assert_eq!(loader.load(None).await.unwrap(), CatalogPage::List(vec![]));
    }

    #[tokio::test]
    async fn test_load_collections_null_result_is_empty() {
        let mut store = MockContentStore::new();
        store.expect_fetch().returning(|_, _| Ok(Value::Null));
        let loader = CatalogLoader::new(Arc::new(store));

        assert!(loader.load_collections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_collection_by_slug() {
        let mut store = MockContentStore::new();
        let mut expected_params = QueryParams::new();
        expected_params.insert("id".to_string(), json!("apes"));
        store
            .expect_fetch()
            .with(eq(collection_by_slug_query()), eq(expected_params))
            .times(1)
            .returning(|_, _| Ok(apes_document()));
        let loader = CatalogLoader::new(Arc::new(store));

        match loader.load(Some("apes")).await.unwrap() {
            CatalogPage::Detail(collection) => {
                assert_eq!(collection.slug.current, "apes");
                assert_eq!(
                    collection.address.as_deref(),
                    Some("0xAbc0000000000000000000000000000000000001")
                );
            },
            other => panic!("Expected a detail page, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_collection_not_found() {
        let mut store = MockContentStore::new();
        store.expect_fetch().times(1).returning(|_, _| Ok(Value::Null));
        let loader = CatalogLoader::new(Arc::new(store));

        assert_eq!(
            loader.load_collection("ghost").await,
            Err(CatalogError::NotFound("ghost".to_string()))
        );
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_load_collection_with_other_slug_is_not_found() {
        let mut store = MockContentStore::new();
        store.expect_fetch().returning(|_, _| Ok(apes_document()));
        let loader = CatalogLoader::new(Arc::new(store));

        assert_eq!(
            loader.load_collection("bears").await,
            Err(CatalogError::NotFound("bears".to_string()))
        );
        assert!(logs_contain("returned collection apes for slug bears"));
    }

    #[tokio::test]
    async fn test_content_store_errors_are_propagated() {
        let mut store = MockContentStore::new();
        store.expect_fetch().returning(|_, _| {
            Err(ContentStoreError::Status {
                status: 500,
                body: "boom".to_string(),
            })
        });
        let loader = CatalogLoader::new(Arc::new(store));

        assert!(matches!(
            loader.load_collections().await,
            Err(CatalogError::ContentStore(ContentStoreError::Status { status: 500, .. }))
        ));
    }

    #[tokio::test]
    async fn test_malformed_document_is_a_decode_error() {
        let mut store = MockContentStore::new();
        store
            .expect_fetch()
            .returning(|_, _| Ok(json!({ "title": "no id, no slug" })));
        let loader = CatalogLoader::new(Arc::new(store));

        assert!(matches!(
            loader.load_collection("apes").await,
            Err(CatalogError::Decode(_))
        ));
    }
}
