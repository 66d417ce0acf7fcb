use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::models::{ClaimCondition, ClaimReceipt, ClaimedToken};
use interface::drop_contract::DropContract;
use interface::error::DropContractError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;
use tracing::{debug, info, warn};

use super::EngineClient;

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

#[derive(Deserialize)]
struct Erc721Token {
    metadata: TokenMetadata,
    #[serde(default)]
    owner: Option<String>,
}

#[derive(Deserialize)]
struct TokenMetadata {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EngineClaimCondition {
    currency_metadata: CurrencyMetadata,
    #[serde(default)]
    max_claimable_supply: Option<Value>,
    #[serde(default)]
    start_time: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrencyMetadata {
    display_value: String,
    #[serde(default)]
    symbol: Option<String>,
}

#[derive(Serialize)]
struct ClaimToRequest<'a> {
    receiver: &'a str,
    quantity: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueuedTransaction {
    queue_id: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatus {
    pub status: String,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug)]
enum PollError {
    Pending,
    Failed(DropContractError),
}

/// Accepts both `"21"` and `21`.
fn parse_count(value: &Value) -> Result<u64, DropContractError> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse::<u64>().ok(),
        _ => None,
    }
    .ok_or_else(|| DropContractError::InvalidResponse(format!("not a count: {}", value)))
}

fn is_claimed(token: &Erc721Token) -> bool {
    token
        .owner
        .as_deref()
        .map(|owner| !owner.is_empty() && !owner.eq_ignore_ascii_case(ZERO_ADDRESS))
        .unwrap_or(false)
}

/// The condition in effect at `now` (latest start not in the future) goes
/// first, the rest keep their order.
fn active_first(mut conditions: Vec<ClaimCondition>, now: DateTime<Utc>) -> Vec<ClaimCondition> {
    let active = conditions
        .iter()
        .enumerate()
        .filter_map(|(i, c)| {
            let start = c.start_time.as_deref()?;
            let start = DateTime::parse_from_rfc3339(start).ok()?;
            (start.with_timezone(&Utc) <= now).then_some((i, start))
        })
        .max_by_key(|(_, start)| *start)
        .map(|(i, _)| i);

    if let Some(i) = active {
        let condition = conditions.remove(i);
        conditions.insert(0, condition);
    }
    conditions
}

fn into_claim_condition(condition: EngineClaimCondition) -> ClaimCondition {
    ClaimCondition {
        price: condition.currency_metadata.display_value,
        currency_symbol: condition.currency_metadata.symbol,
        max_claimable_supply: condition.max_claimable_supply.map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        }),
        start_time: condition.start_time,
    }
}

/// Tokens of `receiver` that were not claimed before.
fn received_since(
    claimed_before: &HashSet<String>,
    claimed_after: Vec<ClaimedToken>,
    receiver: &str,
) -> Vec<String> {
    claimed_after
        .into_iter()
        .filter(|token| {
            token.owner.eq_ignore_ascii_case(receiver) && !claimed_before.contains(&token.token_id)
        })
        .map(|token| token.token_id)
        .collect()
}

fn classify_status(status: &TransactionStatus) -> Result<Option<String>, PollError> {
    match status.status.as_str() {
        "mined" => Ok(status.transaction_hash.clone()),
        "errored" => Err(PollError::Failed(DropContractError::from_message(
            status
                .error_message
                .clone()
                .unwrap_or_else(|| "transaction errored".to_string()),
        ))),
        "cancelled" => Err(PollError::Failed(DropContractError::UserRejected(
            status
                .error_message
                .clone()
                .unwrap_or_else(|| "transaction cancelled".to_string()),
        ))),
        _ => Err(PollError::Pending),
    }
}

/// Drop handle bound to one contract address.
pub struct EngineDropContract {
    client: EngineClient,
    address: String,
}

impl EngineDropContract {
    pub fn new(client: EngineClient, address: &str) -> Self {
        Self {
            client,
            address: address.to_string(),
        }
    }

    fn contract_path(&self, endpoint: &str) -> String {
        format!(
            "contract/{}/{}/{}",
            self.client.config().chain,
            self.address,
            endpoint
        )
    }

    async fn wait_for_transaction(&self, queue_id: &str) -> Result<Option<String>, DropContractError> {
        let config = self.client.config();
        let attempts = (config.claim_timeout.as_millis() / config.claim_poll_interval.as_millis().max(1))
            .max(1) as usize;
        let strategy = FixedInterval::new(config.claim_poll_interval).take(attempts);
        let path = format!("transaction/status/{}", queue_id);

        let result = RetryIf::spawn(
            strategy,
            || {
                let path = path.clone();
                async move {
                    let status: TransactionStatus =
                        match self.client.get("transaction_status", &path).await {
                            Ok(status) => status,
                            // the queued transaction may still mine
                            Err(DropContractError::Network(e)) => {
                                warn!("Status of {} is unavailable, polling again: {}", queue_id, e);
                                return Err(PollError::Pending);
                            },
                            Err(e) => return Err(PollError::Failed(e)),
                        };
                    debug!("Transaction {} is {}", queue_id, status.status);
                    classify_status(&status)
                }
            },
            |e: &PollError| matches!(e, PollError::Pending),
        )
        .await;

        match result {
            Ok(hash) => Ok(hash),
            Err(PollError::Failed(e)) => Err(e),
            Err(PollError::Pending) => Err(DropContractError::Timeout(queue_id.to_string())),
        }
    }

    async fn claimed_ids(&self) -> Option<HashSet<String>> {
        match self.get_all_claimed().await {
            Ok(tokens) => Some(tokens.into_iter().map(|token| token.token_id).collect()),
            Err(e) => {
                warn!("Cannot read claimed tokens of {}: {}", self.address, e);
                None
            },
        }
    }

    /// Best effort, empty when either claimed-set read failed.
    async fn minted_token_ids(
        &self,
        claimed_before: Option<HashSet<String>>,
        receiver: &str,
    ) -> Vec<String> {
        let Some(claimed_before) = claimed_before else {
            return Vec::new();
        };
        match self.get_all_claimed().await {
            Ok(claimed_after) => received_since(&claimed_before, claimed_after, receiver),
            Err(e) => {
                warn!("Cannot read claimed tokens of {}: {}", self.address, e);
                Vec::new()
            },
        }
    }
}

#[async_trait]
impl DropContract for EngineDropContract {
    async fn get_all_claimed(&self) -> Result<Vec<ClaimedToken>, DropContractError> {
        let tokens: Vec<Erc721Token> = self
            .client
            .get("get_all", &self.contract_path("erc721/get-all"))
            .await?;

        Ok(tokens
            .into_iter()
            .filter(is_claimed)
            .map(|token| ClaimedToken {
                token_id: token.metadata.id,
                owner: token.owner.unwrap_or_default(),
            })
            .collect())
    }

    async fn total_supply(&self) -> Result<u64, DropContractError> {
        let count: Value = self
            .client
            .get("total_count", &self.contract_path("erc721/total-count"))
            .await?;
        parse_count(&count)
    }

    async fn active_claim_conditions(&self) -> Result<Vec<ClaimCondition>, DropContractError> {
        let conditions: Vec<EngineClaimCondition> = self
            .client
            .get(
                "claim_conditions",
                &self.contract_path("erc721/claim-conditions/get-all"),
            )
            .await?;

        Ok(active_first(
            conditions.into_iter().map(into_claim_condition).collect(),
            Utc::now(),
        ))
    }

    async fn claim_to(
        &self,
        receiver: &str,
        quantity: u64,
    ) -> Result<ClaimReceipt, DropContractError> {
        let backend_wallet = self
            .client
            .config()
            .backend_wallet_address
            .clone()
            .ok_or_else(|| DropContractError::InvalidAddress("no backend wallet".to_string()))?;

        let claimed_before = self.claimed_ids().await;
        let queued: QueuedTransaction = self
            .client
            .post(
                "claim_to",
                &self.contract_path("erc721/claim-to"),
                &backend_wallet,
                &ClaimToRequest {
                    receiver,
                    quantity: quantity.to_string(),
                },
            )
            .await?;
        info!("Claim for {} queued as {}", receiver, queued.queue_id);

        match self.wait_for_transaction(&queued.queue_id).await {
            Ok(transaction_hash) => Ok(ClaimReceipt {
                token_ids: self.minted_token_ids(claimed_before, receiver).await,
                transaction_hash,
                queue_id: Some(queued.queue_id),
            }),
            Err(e) => {
                warn!("Claim {} did not succeed: {}", queued.queue_id, e);
                Err(e)
            },
        }
    }
}
