use async_trait::async_trait;
use interface::error::WalletError;
use interface::wallet::Wallet;
use tokio::sync::RwLock;

/// Wallet that connects to a fixed address, or refuses when it has none.
pub struct StaticWallet {
    address: Option<String>,
    connected: RwLock<Option<String>>,
}

impl StaticWallet {
    pub fn new(address: Option<String>, connected: bool) -> Self {
        let connected = if connected { address.clone() } else { None };
        Self {
            address,
            connected: RwLock::new(connected),
        }
    }
}

#[async_trait]
impl Wallet for StaticWallet {
    async fn connect(&self) -> Result<String, WalletError> {
        let address = self.address.clone().ok_or(WalletError::NotConfigured)?;
        *self.connected.write().await = Some(address.clone());
        Ok(address)
    }

    async fn disconnect(&self) {
        *self.connected.write().await = None;
    }

    async fn current_address(&self) -> Option<String> {
        self.connected.read().await.clone()
    }
}
