use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use entities::models::{ClaimCondition, ClaimReceipt, ClaimedToken};
use interface::drop_contract::{DropContract, DropContractProvider};
use interface::error::DropContractError;

/// Drop contract with a fixed supply. Successful claims raise the claimed count.
pub struct ScriptedDropContract {
    claimed: AtomicU64,
    total: u64,
    price: Option<String>,
    supply_error: Option<DropContractError>,
    claim_errors: Mutex<Vec<DropContractError>>,
    receivers: Mutex<Vec<String>>,
}

impl ScriptedDropContract {
    pub fn new(claimed: u64, total: u64, price: &str) -> Self {
        Self {
            claimed: AtomicU64::new(claimed),
            total,
            price: Some(price.to_string()),
            supply_error: None,
            claim_errors: Mutex::new(Vec::new()),
            receivers: Mutex::new(Vec::new()),
        }
    }

    pub fn without_price(mut self) -> Self {
        self.price = None;
        self
    }

    pub fn failing_supply(mut self, error: DropContractError) -> Self {
        self.supply_error = Some(error);
        self
    }

    /// The next claim fails with `error`.
    pub fn fail_next_claim(&self, error: DropContractError) {
        if let Ok(mut errors) = self.claim_errors.lock() {
            errors.push(error);
        }
    }

    pub fn claimed(&self) -> u64 {
        self.claimed.load(Ordering::SeqCst)
    }

    pub fn receivers(&self) -> Vec<String> {
        self.receivers
            .lock()
            .map(|receivers| receivers.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DropContract for ScriptedDropContract {
    async fn get_all_claimed(&self) -> Result<Vec<ClaimedToken>, DropContractError> {
        if let Some(e) = &self.supply_error {
            return Err(e.clone());
        }
        Ok((0..self.claimed())
            .map(|id| ClaimedToken {
                token_id: id.to_string(),
                owner: format!("0x{:040x}", id + 1),
            })
            .collect())
    }

    async fn total_supply(&self) -> Result<u64, DropContractError> {
        match &self.supply_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.total),
        }
    }

    async fn active_claim_conditions(&self) -> Result<Vec<ClaimCondition>, DropContractError> {
        match &self.price {
            Some(price) => Ok(vec![ClaimCondition {
                price: price.clone(),
                currency_symbol: Some("ETH".to_string()),
                max_claimable_supply: None,
                start_time: None,
            }]),
            None => Err(DropContractError::Network("claim conditions unavailable".to_string())),
        }
    }

    async fn claim_to(
        &self,
        receiver: &str,
        quantity: u64,
    ) -> Result<ClaimReceipt, DropContractError> {
        if let Ok(mut receivers) = self.receivers.lock() {
            receivers.push(receiver.to_string());
        }
        let next_error = self.claim_errors.lock().ok().and_then(|mut errors| errors.pop());
        if let Some(e) = next_error {
            return Err(e);
        }

        let first = self.claimed.fetch_add(quantity, Ordering::SeqCst);
        Ok(ClaimReceipt {
            token_ids: (first..first + quantity).map(|id| id.to_string()).collect(),
            transaction_hash: Some(format!("0x{:064x}", first + 1)),
            queue_id: None,
        })
    }
}

/// Provider over a fixed set of scripted contracts. Unknown addresses are invalid.
pub struct ScriptedDropContracts {
    contracts: HashMap<String, Arc<ScriptedDropContract>>,
}

impl ScriptedDropContracts {
    pub fn new(contracts: Vec<(String, Arc<ScriptedDropContract>)>) -> Self {
        Self {
            contracts: contracts.into_iter().collect(),
        }
    }

    pub fn get(&self, address: &str) -> Option<Arc<ScriptedDropContract>> {
        self.contracts.get(address).cloned()
    }
}

impl DropContractProvider for ScriptedDropContracts {
    fn drop_contract(&self, address: &str) -> Result<Arc<dyn DropContract>, DropContractError> {
        match self.contracts.get(address) {
            Some(drop_contract) => Ok(drop_contract.clone()),
            None => Err(DropContractError::InvalidAddress(address.to_string())),
        }
    }
}
