use async_trait::async_trait;
use mockall::automock;

use crate::error::WalletError;

#[automock]
#[async_trait]
pub trait Wallet: Send + Sync {
    async fn connect(&self) -> Result<String, WalletError>;
    async fn disconnect(&self);
    async fn current_address(&self) -> Option<String>;
}
