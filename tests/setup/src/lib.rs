pub mod awaitility;
pub mod content;
pub mod drops;
pub mod fixtures;
pub mod wallet;

use std::sync::Arc;

use axum::Router;
use entities::models::Collection;
use metrics_utils::StorefrontMetricsConfig;
use storefront::notifications::ToastCenter;
use storefront::sanity::SanityImageUrlBuilder;
use storefront::web::handlers::StorefrontHandler;
use storefront::web::service::router;
use storefront::web::sessions::MintSessions;
use tokio_util::sync::CancellationToken;

use crate::content::InMemoryContentStore;
use crate::drops::{ScriptedDropContract, ScriptedDropContracts};
use crate::wallet::StaticWallet;

pub const TEST_PROJECT_ID: &str = "testproj";
pub const TEST_DATASET: &str = "production";

/// Storefront wired to in-memory collaborators.
pub struct TestApp {
    pub handler: Arc<StorefrontHandler>,
    pub content_store: Arc<InMemoryContentStore>,
    pub drop_contracts: Arc<ScriptedDropContracts>,
    pub wallet: Arc<StaticWallet>,
    pub notifications: Arc<ToastCenter>,
    pub metrics: Arc<StorefrontMetricsConfig>,
    pub shutdown_token: CancellationToken,
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder::default()
    }

    pub fn router(&self) -> Router {
        router(self.handler.clone())
    }
}

#[derive(Default)]
pub struct TestAppBuilder {
    collections: Vec<Collection>,
    drops: Vec<(String, Arc<ScriptedDropContract>)>,
    wallet_address: Option<String>,
    connected: bool,
}

impl TestAppBuilder {
    pub fn collection(mut self, collection: Collection) -> Self {
        self.collections.push(collection);
        self
    }

    pub fn drop_contract(mut self, address: &str, drop_contract: Arc<ScriptedDropContract>) -> Self {
        self.drops.push((address.to_string(), drop_contract));
        self
    }

    /// Wallet that can be connected; `connected` signs it in right away.
    pub fn wallet(mut self, address: &str, connected: bool) -> Self {
        self.wallet_address = Some(address.to_string());
        self.connected = connected;
        self
    }

    pub fn build(self) -> TestApp {
        let content_store = Arc::new(InMemoryContentStore::new(self.collections));
        let drop_contracts = Arc::new(ScriptedDropContracts::new(self.drops));
        let wallet = Arc::new(StaticWallet::new(self.wallet_address, self.connected));
        let notifications = Arc::new(ToastCenter::new());
        let metrics = Arc::new(StorefrontMetricsConfig::new());
        let shutdown_token = CancellationToken::new();

        let sessions = MintSessions::new(
            drop_contracts.clone(),
            wallet.clone(),
            notifications.clone(),
            metrics.clone(),
            shutdown_token.clone(),
        );
        let handler = Arc::new(StorefrontHandler::new(
            content_store.clone(),
            Arc::new(SanityImageUrlBuilder::new(TEST_PROJECT_ID, TEST_DATASET)),
            sessions,
            wallet.clone(),
            notifications.clone(),
            metrics.clone(),
        ));

        TestApp {
            handler,
            content_store,
            drop_contracts,
            wallet,
            notifications,
            metrics,
            shutdown_token,
        }
    }
}
