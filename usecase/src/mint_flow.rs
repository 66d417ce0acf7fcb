use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use entities::enums::{FetchState, MintFailureKind, MintPhase};
use entities::models::{ClaimReceipt, DropStatus, Notification};
use interface::drop_contract::DropContract;
use interface::error::{DropContractError, WalletError};
use interface::notifications::Notifier;
use interface::wallet::Wallet;
use metrics_utils::{MetricStatus, StorefrontMetricsConfig};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const MINTING_MESSAGE: &str = "Minting..";
pub const MINT_SUCCESS_MESSAGE: &str = "HOORAY.. You Successfully Minted!";
pub const MINT_FAILURE_MESSAGE: &str = "Whoops... Something went wrong!";
pub const SUCCESS_NOTIFICATION_DURATION: Duration = Duration::from_secs(8);
pub const FAILURE_NOTIFICATION_DURATION: Duration = Duration::from_secs(4);
const MINT_QUANTITY: u64 = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum MintOutcome {
    Minted(ClaimReceipt),
    Failed(MintFailureKind),
    Skipped(SkipReason),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoDropContract,
    NoWallet,
    InFlight,
    // status unknown or sold out
    NotReady,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum LastMint {
    Succeeded,
    Failed(MintFailureKind),
}

#[derive(Debug, Default)]
struct ControllerState {
    status: DropStatus,
    last_mint: Option<LastMint>,
}

/// Consistent snapshot of a controller, used for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct MintView {
    pub phase: MintPhase,
    pub status: DropStatus,
    pub address: Option<String>,
    pub last_failure: Option<MintFailureKind>,
}

impl MintView {
    pub fn can_mint(&self) -> bool {
        self.phase.is_mint_enabled()
    }
}

/// Clears the in-flight flag however the mint attempt ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Mint flow of one drop page: drop status reads on mount, one claim per
/// mint action, notifications for the outcome.
pub struct MintFlowController<W: Wallet + ?Sized, N: Notifier + ?Sized> {
    drop_contract: Option<Arc<dyn DropContract>>,
    wallet: Arc<W>,
    notifier: Arc<N>,
    metrics: Arc<StorefrontMetricsConfig>,
    state: RwLock<ControllerState>,
    minting: AtomicBool,
    lifetime: CancellationToken,
}

impl<W: Wallet + ?Sized, N: Notifier + ?Sized> MintFlowController<W, N> {
    pub fn new(
        drop_contract: Option<Arc<dyn DropContract>>,
        wallet: Arc<W>,
        notifier: Arc<N>,
        metrics: Arc<StorefrontMetricsConfig>,
        lifetime: CancellationToken,
    ) -> Self {
        Self {
            drop_contract,
            wallet,
            notifier,
            metrics,
            state: RwLock::new(ControllerState::default()),
            minting: AtomicBool::new(false),
            lifetime,
        }
    }

    pub async fn mount(&self) {
        self.refresh_status().await;
    }

    /// Results of reads still in flight are dropped after this.
    pub fn unmount(&self) {
        self.lifetime.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        !self.lifetime.is_cancelled()
    }

    /// Issues the supply read and the price read concurrently and applies
    /// both results once both have resolved.
    pub async fn refresh_status(&self) {
        let Some(drop_contract) = self.drop_contract.clone() else {
            debug!("No drop contract, drop status stays unknown");
            return;
        };
        if !self.is_mounted() {
            return;
        }

        {
            let mut state = self.state.write().await;
            state.status.supply_state = FetchState::Pending;
            state.status.price_state = FetchState::Pending;
        }

        let (supply, price) = tokio::join!(
            fetch_supply(drop_contract.as_ref()),
            fetch_price(drop_contract.as_ref())
        );

        if !self.is_mounted() {
            debug!("Controller unmounted, dropping drop status results");
            return;
        }

        let mut state = self.state.write().await;
        match supply {
            Ok((claimed, total)) => {
                state.status.claimed = claimed;
                state.status.total = Some(total);
                state.status.supply_state = FetchState::Loaded;
            },
            Err(e) => {
                warn!("Cannot fetch drop supply: {}", e);
                state.status.claimed = 0;
                state.status.total = None;
                state.status.supply_state = FetchState::Failed;
            },
        }
        match price {
            Ok(price) => {
                state.status.price = price;
                state.status.price_state = FetchState::Loaded;
            },
            Err(e) => {
                warn!("Cannot fetch drop price: {}", e);
                state.status.price = None;
                state.status.price_state = FetchState::Failed;
            },
        }
    }

    pub async fn connect(&self) -> Result<String, WalletError> {
        let address = self.wallet.connect().await?;
        let needs_status = self.state.read().await.status.supply_state != FetchState::Loaded;
        if needs_status {
            self.refresh_status().await;
        }
        Ok(address)
    }

    pub async fn disconnect(&self) {
        self.wallet.disconnect().await;
    }

    pub async fn status(&self) -> DropStatus {
        self.state.read().await.status.clone()
    }

    pub async fn phase(&self) -> MintPhase {
        self.view().await.phase
    }

    pub async fn can_mint(&self) -> bool {
        self.drop_contract.is_some() && self.phase().await.is_mint_enabled()
    }

    pub async fn last_failure(&self) -> Option<MintFailureKind> {
        match self.state.read().await.last_mint {
            Some(LastMint::Failed(kind)) => Some(kind),
            _ => None,
        }
    }

    pub async fn view(&self) -> MintView {
        let address = self.wallet.current_address().await;
        let state = self.state.read().await;
        let in_flight = self.minting.load(Ordering::Acquire);

        let phase = if in_flight {
            MintPhase::Minting
        } else if address.is_none() {
            MintPhase::Disconnected
        } else if state.status.is_loading() || !state.status.is_supply_known() {
            MintPhase::Loading
        } else if state.status.is_sold_out() {
            MintPhase::SoldOut
        } else {
            match state.last_mint {
                Some(LastMint::Succeeded) => MintPhase::Success,
                Some(LastMint::Failed(_)) => MintPhase::Failed,
                None => MintPhase::Idle,
            }
        };

        MintView {
            phase,
            status: state.status.clone(),
            address,
            last_failure: match state.last_mint {
                Some(LastMint::Failed(kind)) => Some(kind),
                _ => None,
            },
        }
    }

    /// Claims one token for the connected wallet. Calls made while the
    /// action is disabled are no-ops.
    pub async fn mint(&self) -> MintOutcome {
        let Some(drop_contract) = self.drop_contract.clone() else {
            return self.skip(SkipReason::NoDropContract);
        };
        let Some(address) = self.wallet.current_address().await else {
            return self.skip(SkipReason::NoWallet);
        };
        if self
            .minting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return self.skip(SkipReason::InFlight);
        }
        let in_flight = InFlightGuard(&self.minting);

        {
            let state = self.state.read().await;
            if state.status.is_loading()
                || !state.status.is_supply_known()
                || state.status.is_sold_out()
            {
                drop(state);
                drop(in_flight);
                return self.skip(SkipReason::NotReady);
            }
        }

        let minting_toast = self
            .notifier
            .show(Notification::loading(MINTING_MESSAGE))
            .await;
        let result = drop_contract.claim_to(&address, MINT_QUANTITY).await;
        self.notifier.dismiss(minting_toast).await;

        match result {
            Ok(receipt) => {
                info!(
                    "Claimed {:?} for {}, tx: {:?}",
                    receipt.token_ids, address, receipt.transaction_hash
                );
                self.notifier
                    .show(Notification::success(
                        MINT_SUCCESS_MESSAGE,
                        SUCCESS_NOTIFICATION_DURATION,
                    ))
                    .await;
                self.metrics.inc_mint_attempts(MetricStatus::SUCCESS, "");
                self.record(LastMint::Succeeded).await;

                // a second claim must see the post-mint supply
                self.refresh_status().await;
                drop(in_flight);

                MintOutcome::Minted(receipt)
            },
            Err(e) => {
                let kind = e.failure_kind();
                error!("Mint for {} failed ({}): {}", address, kind, e);
                self.notifier
                    .show(Notification::error(
                        MINT_FAILURE_MESSAGE,
                        FAILURE_NOTIFICATION_DURATION,
                    ))
                    .await;
                self.metrics
                    .inc_mint_attempts(MetricStatus::FAILURE, &kind.to_string());
                self.record(LastMint::Failed(kind)).await;

                MintOutcome::Failed(kind)
            },
        }
    }

    fn skip(&self, reason: SkipReason) -> MintOutcome {
        debug!("Mint skipped: {:?}", reason);
        self.metrics
            .inc_mint_attempts(MetricStatus::SKIPPED, &format!("{:?}", reason));
        MintOutcome::Skipped(reason)
    }

    async fn record(&self, last_mint: LastMint) {
        if self.is_mounted() {
            self.state.write().await.last_mint = Some(last_mint);
        }
    }
}

async fn fetch_supply(drop_contract: &dyn DropContract) -> Result<(u64, u64), DropContractError> {
    let (claimed, total) =
        tokio::try_join!(drop_contract.get_all_claimed(), drop_contract.total_supply())?;
    Ok((claimed.len() as u64, total))
}

async fn fetch_price(drop_contract: &dyn DropContract) -> Result<Option<String>, DropContractError> {
    let conditions = drop_contract.active_claim_conditions().await?;
    Ok(conditions.first().map(|condition| condition.price.clone()))
}
