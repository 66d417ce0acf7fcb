use std::sync::Arc;

use async_trait::async_trait;
use entities::models::{ClaimCondition, ClaimReceipt, ClaimedToken};
use mockall::automock;

use crate::error::DropContractError;

/// Handle of a single drop contract.
#[automock]
#[async_trait]
pub trait DropContract: Send + Sync {
    async fn get_all_claimed(&self) -> Result<Vec<ClaimedToken>, DropContractError>;
    async fn total_supply(&self) -> Result<u64, DropContractError>;
    /// Ordered claim conditions, the active one first.
    async fn active_claim_conditions(&self) -> Result<Vec<ClaimCondition>, DropContractError>;
    async fn claim_to(
        &self,
        receiver: &str,
        quantity: u64,
    ) -> Result<ClaimReceipt, DropContractError>;
}

#[automock]
pub trait DropContractProvider: Send + Sync {
    fn drop_contract(&self, address: &str) -> Result<Arc<dyn DropContract>, DropContractError>;
}
