pub mod drop_contract;
pub mod wallet;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use interface::drop_contract::{DropContract, DropContractProvider};
use interface::error::DropContractError;
use metrics_utils::red::{CallLabel, RequestErrorDurationMetrics};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::error;
use url::Url;

use self::drop_contract::EngineDropContract;

const COMPONENT: &str = "engine";
pub const BACKEND_WALLET_HEADER: &str = "x-backend-wallet-address";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub base_url: Url,
    pub chain: String,
    pub access_token: Option<String>,
    pub backend_wallet_address: Option<String>,
    pub claim_timeout: Duration,
    pub claim_poll_interval: Duration,
}

#[derive(Deserialize)]
struct EngineResponse<T> {
    result: T,
}

#[derive(Deserialize)]
struct EngineErrorBody {
    error: EngineErrorMessage,
}

#[derive(Deserialize)]
struct EngineErrorMessage {
    message: String,
}

/// Maps a non-success gateway response onto a [`DropContractError`].
pub fn error_from_response(status: StatusCode, body: &str) -> DropContractError {
    let message = serde_json::from_str::<EngineErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| format!("{}: {}", status, body));

    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        DropContractError::Network(message)
    } else {
        DropContractError::from_message(message)
    }
}

/// `0x` followed by 40 hex digits.
pub fn validate_address(address: &str) -> Result<(), DropContractError> {
    let valid = address
        .strip_prefix("0x")
        .map(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(DropContractError::InvalidAddress(address.to_string()))
    }
}

/// HTTP client of a thirdweb Engine compatible gateway.
#[derive(Clone)]
pub struct EngineClient {
    client: reqwest::Client,
    config: Arc<EngineConfig>,
    red_metrics: Arc<RequestErrorDurationMetrics>,
}

impl EngineClient {
    pub fn new(
        mut config: EngineConfig,
        client: reqwest::Client,
        red_metrics: Arc<RequestErrorDurationMetrics>,
    ) -> Self {
        // relative joins drop the last segment otherwise
        if !config.base_url.path().ends_with('/') {
            let path = format!("{}/", config.base_url.path());
            config.base_url.set_path(&path);
        }
        Self {
            client,
            config: Arc::new(config),
            red_metrics,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn url(&self, path: &str) -> Result<Url, DropContractError> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| DropContractError::InvalidResponse(format!("bad path {}: {}", path, e)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        action: &str,
        path: &str,
    ) -> Result<T, DropContractError> {
        let request = self.client.get(self.url(path)?);
        self.send(action, request).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        action: &str,
        path: &str,
        backend_wallet: &str,
        body: &B,
    ) -> Result<T, DropContractError> {
        let request = self
            .client
            .post(self.url(path)?)
            .header(BACKEND_WALLET_HEADER, backend_wallet)
            .json(body);
        self.send(action, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        action: &str,
        request: RequestBuilder,
    ) -> Result<T, DropContractError> {
        let start_time = Utc::now();
        let result = self.send_inner(request).await;
        if let Err(e) = &result {
            error!("Engine {} request failed: {}", action, e);
        }
        self.red_metrics.observe_call(
            &CallLabel::new(COMPONENT, action, &self.config.chain),
            start_time,
            result.is_err(),
        );
        result
    }

    async fn send_inner<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, DropContractError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(status, &body));
        }

        let body: EngineResponse<T> = response.json().await?;
        Ok(body.result)
    }
}

impl DropContractProvider for EngineClient {
    fn drop_contract(&self, address: &str) -> Result<Arc<dyn DropContract>, DropContractError> {
        validate_address(address)?;
        Ok(Arc::new(EngineDropContract::new(self.clone(), address)))
    }
}
