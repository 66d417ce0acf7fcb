use std::time::Duration;

use clap::Parser;
use figment::{providers::Env, Figment};
use serde::Deserialize;
use tracing_subscriber::fmt;

use crate::error::StorefrontError;
use crate::sanity::SanityConfig;
use crate::thirdweb::EngineConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct StorefrontClapArgs {
    #[clap(long, env = "SANITY_PROJECT_ID", help = "#sanity Project id, example: 3x7k1p9q")]
    pub sanity_project_id: String,
    #[clap(long, env = "SANITY_DATASET", default_value = "production", help = "#sanity Dataset")]
    pub sanity_dataset: String,
    #[clap(long, default_value = "2021-10-21", help = "#sanity Query API version")]
    pub sanity_api_version: String,
    #[clap(long, default_value_t = false, help = "#sanity Query the API CDN (default: false)")]
    pub sanity_use_cdn: bool,
    #[clap(long, env = "SANITY_API_TOKEN", help = "#sanity Read token for private datasets")]
    pub sanity_token: Option<String>,

    #[clap(long, env = "ENGINE_URL", help = "#engine Drop gateway url, example: http://localhost:3005")]
    pub engine_url: String,
    #[clap(long, default_value = "mumbai", help = "#engine Chain name or id")]
    pub chain: String,
    #[clap(long, env = "ENGINE_ACCESS_TOKEN", help = "#engine Access token")]
    pub engine_access_token: Option<String>,
    #[clap(long, env = "BACKEND_WALLET_ADDRESS", help = "#engine Wallet used to sign claims")]
    pub backend_wallet_address: Option<String>,
    #[clap(long, default_value = "120", help = "#engine Seconds to wait for a claim to be mined")]
    pub claim_timeout_sec: u64,
    #[clap(long, default_value = "2000", help = "#engine Claim status poll interval")]
    pub claim_poll_interval_millis: u64,

    #[clap(long, default_value = "3000", help = "Server port")]
    pub server_port: u16,
    #[clap(long, help = "Metrics port")]
    pub metrics_port: Option<u16>,
    #[clap(long, default_value = "info", help = "info|debug")]
    pub log_level: String,
}

impl StorefrontClapArgs {
    pub fn sanity_config(&self) -> SanityConfig {
        SanityConfig {
            project_id: self.sanity_project_id.clone(),
            dataset: self.sanity_dataset.clone(),
            api_version: self.sanity_api_version.clone(),
            use_cdn: self.sanity_use_cdn,
            token: self.sanity_token.clone(),
        }
    }

    pub fn engine_config(&self) -> Result<EngineConfig, StorefrontError> {
        if self.claim_poll_interval_millis == 0 {
            return Err(StorefrontError::ConfigurationError {
                msg: "claim_poll_interval_millis must be positive".to_string(),
            });
        }
        Ok(EngineConfig {
            base_url: url::Url::parse(&self.engine_url)?,
            chain: self.chain.clone(),
            access_token: self.engine_access_token.clone(),
            backend_wallet_address: self.backend_wallet_address.clone(),
            claim_timeout: Duration::from_secs(self.claim_timeout_sec),
            claim_poll_interval: Duration::from_millis(self.claim_poll_interval_millis),
        })
    }
}

pub const STOREFRONT_CONFIG_PREFIX: &str = "STOREFRONT_";

/// Settings of the outbound HTTP clients, read from `STOREFRONT_*` variables.
#[derive(Deserialize, PartialEq, Debug, Clone)]
pub struct HttpClientConfig {
    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_sec: default_request_timeout_sec(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpClientConfig {
    pub fn build_client(&self) -> Result<reqwest::Client, StorefrontError> {
        Ok(reqwest::ClientBuilder::new()
            .timeout(Duration::from_secs(self.request_timeout_sec))
            .user_agent(self.user_agent.clone())
            .build()?)
    }
}

const fn default_request_timeout_sec() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("storefront/{}", env!("CARGO_PKG_VERSION"))
}

pub fn setup_config<'a, T: Deserialize<'a>>(config_prefix: &str) -> Result<T, StorefrontError> {
    dotenvy::dotenv().ok();

    let figment = Figment::new().join(Env::prefixed(config_prefix));

    figment
        .extract()
        .map_err(|config_error| StorefrontError::ConfigurationError {
            msg: format!("{}", config_error),
        })
}

pub fn init_logger(log_level: &str) {
    let t = tracing_subscriber::fmt().with_env_filter(log_level);
    t.event_format(fmt::format::json()).init();
}
