use async_trait::async_trait;
use interface::error::WalletError;
use interface::wallet::Wallet;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::EngineClient;

const BACKEND_WALLETS_PATH: &str = "backend-wallet/get-all?page=1&limit=100";

#[derive(Deserialize)]
struct BackendWalletEntry {
    address: String,
}

fn find_wallet<'a>(wallets: &'a [BackendWalletEntry], address: &str) -> Option<&'a str> {
    wallets
        .iter()
        .find(|w| w.address.eq_ignore_ascii_case(address))
        .map(|w| w.address.as_str())
}

/// Wallet backed by one of the gateway's backend wallets. Connecting checks
/// that the configured address is managed by the gateway.
pub struct BackendWallet {
    client: EngineClient,
    connected: RwLock<Option<String>>,
}

impl BackendWallet {
    pub fn new(client: EngineClient) -> Self {
        Self {
            client,
            connected: RwLock::new(None),
        }
    }
}

#[async_trait]
impl Wallet for BackendWallet {
    async fn connect(&self) -> Result<String, WalletError> {
        let address = self
            .client
            .config()
            .backend_wallet_address
            .clone()
            .ok_or(WalletError::NotConfigured)?;

        let wallets: Vec<BackendWalletEntry> = self
            .client
            .get("backend_wallets", BACKEND_WALLETS_PATH)
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        match find_wallet(&wallets, &address) {
            Some(found) => {
                let found = found.to_string();
                info!("Wallet {} connected", found);
                *self.connected.write().await = Some(found.clone());
                Ok(found)
            },
            None => {
                warn!("Backend wallet {} is not managed by the gateway", address);
                Err(WalletError::NotFound(address))
            },
        }
    }

    async fn disconnect(&self) {
        if let Some(address) = self.connected.write().await.take() {
            info!("Wallet {} disconnected", address);
        }
    }

    async fn current_address(&self) -> Option<String> {
        self.connected.read().await.clone()
    }
}
