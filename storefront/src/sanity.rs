use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use entities::models::Image;
use interface::content_store::{ContentStore, QueryParams};
use interface::error::{ContentStoreError, ImageUrlError};
use interface::image_urls::ImageUrlBuilder;
use metrics_utils::red::{CallLabel, RequestErrorDurationMetrics};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

const API_HOST: &str = "api.sanity.io";
const API_CDN_HOST: &str = "apicdn.sanity.io";
const IMAGE_CDN_URL: &str = "https://cdn.sanity.io/images";
const COMPONENT: &str = "sanity";

#[derive(Debug, Clone, PartialEq)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub token: Option<String>,
}

impl SanityConfig {
    fn validate(&self) -> Result<(), ContentStoreError> {
        let valid_name = |name: &str| {
            !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };
        if !valid_name(&self.project_id) {
            return Err(ContentStoreError::Configuration(format!(
                "invalid project id {:?}",
                self.project_id
            )));
        }
        if !valid_name(&self.dataset) {
            return Err(ContentStoreError::Configuration(format!(
                "invalid dataset {:?}",
                self.dataset
            )));
        }
        Ok(())
    }

    pub fn query_url(&self) -> Result<Url, ContentStoreError> {
        self.validate()?;
        let host = if self.use_cdn { API_CDN_HOST } else { API_HOST };
        let version = self.api_version.trim_start_matches('v');
        Url::parse(&format!(
            "https://{}.{}/v{}/data/query/{}",
            self.project_id, host, version, self.dataset
        ))
        .map_err(|e| ContentStoreError::Configuration(e.to_string()))
    }
}

/// `query` plus one `$name=<json>` pair per parameter.
pub fn build_query_url(base: &Url, query: &str, params: &QueryParams) -> Url {
    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("query", query);
        for (name, value) in params {
            pairs.append_pair(&format!("${}", name), &value.to_string());
        }
    }
    url
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

/// Read-only client of the content store query API.
pub struct SanityClient {
    client: reqwest::Client,
    query_url: Url,
    token: Option<String>,
    red_metrics: Arc<RequestErrorDurationMetrics>,
}

impl SanityClient {
    pub fn new(
        config: &SanityConfig,
        client: reqwest::Client,
        red_metrics: Arc<RequestErrorDurationMetrics>,
    ) -> Result<Self, ContentStoreError> {
        Ok(Self {
            client,
            query_url: config.query_url()?,
            token: config.token.clone(),
            red_metrics,
        })
    }

    async fn run_query(&self, url: Url) -> Result<Value, ContentStoreError> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentStoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: QueryResponse = response.json().await?;
        Ok(body.result)
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn fetch(&self, query: &str, params: &QueryParams) -> Result<Value, ContentStoreError> {
        let start_time = Utc::now();
        let url = build_query_url(&self.query_url, query, params);
        debug!("Querying content store with {} params", params.len());

        let result = self.run_query(url).await;
        if let Err(e) = &result {
            error!("Content store query failed: {}", e);
        }
        self.red_metrics.observe_call(
            &CallLabel::new(COMPONENT, "query", "data/query"),
            start_time,
            result.is_err(),
        );

        result
    }
}

/// Maps `image-<id>-<width>x<height>-<format>` asset references onto the image CDN.
#[derive(Debug, Clone)]
pub struct SanityImageUrlBuilder {
    base_url: String,
}

impl SanityImageUrlBuilder {
    pub fn new(project_id: &str, dataset: &str) -> Self {
        Self {
            base_url: format!("{}/{}/{}", IMAGE_CDN_URL, project_id, dataset),
        }
    }

    pub fn from_config(config: &SanityConfig) -> Self {
        Self::new(&config.project_id, &config.dataset)
    }
}

fn parse_asset_reference(reference: &str) -> Result<(&str, &str, &str), ImageUrlError> {
    let malformed = || ImageUrlError::MalformedReference(reference.to_string());

    let rest = reference.strip_prefix("image-").ok_or_else(malformed)?;
    let (rest, format) = rest.rsplit_once('-').ok_or_else(malformed)?;
    let (id, dimensions) = rest.rsplit_once('-').ok_or_else(malformed)?;

    let (width, height) = dimensions.split_once('x').ok_or_else(malformed)?;
    let is_number = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if id.is_empty() || format.is_empty() || !is_number(width) || !is_number(height) {
        return Err(malformed());
    }

    Ok((id, dimensions, format))
}

impl ImageUrlBuilder for SanityImageUrlBuilder {
    fn url_for(&self, image: &Image) -> Result<String, ImageUrlError> {
        let asset = image.asset.as_ref().ok_or(ImageUrlError::MissingAsset)?;
        let (id, dimensions, format) = parse_asset_reference(&asset.reference)?;

        Ok(format!("{}/{}-{}.{}", self.base_url, id, dimensions, format))
    }
}
