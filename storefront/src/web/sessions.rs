use std::collections::HashMap;
use std::sync::Arc;

use entities::models::Collection;
use interface::drop_contract::{DropContract, DropContractProvider};
use interface::notifications::Notifier;
use interface::wallet::Wallet;
use metrics_utils::StorefrontMetricsConfig;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use usecase::mint_flow::MintFlowController;

pub type PageController = MintFlowController<dyn Wallet, dyn Notifier>;

struct Session {
    address: Option<String>,
    controller: Arc<PageController>,
}

/// One mint controller per drop page, shared by every request for that page.
pub struct MintSessions {
    drop_contracts: Arc<dyn DropContractProvider>,
    wallet: Arc<dyn Wallet>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<StorefrontMetricsConfig>,
    shutdown_token: CancellationToken,
    sessions: Mutex<HashMap<String, Session>>,
}

impl MintSessions {
    pub fn new(
        drop_contracts: Arc<dyn DropContractProvider>,
        wallet: Arc<dyn Wallet>,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<StorefrontMetricsConfig>,
        shutdown_token: CancellationToken,
    ) -> Self {
        Self {
            drop_contracts,
            wallet,
            notifier,
            metrics,
            shutdown_token,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn drop_contract(&self, collection: &Collection) -> Option<Arc<dyn DropContract>> {
        let address = collection.address.as_deref()?;
        match self.drop_contracts.drop_contract(address) {
            Ok(drop_contract) => Some(drop_contract),
            Err(e) => {
                warn!(
                    "No drop contract for collection {}: {}",
                    collection.slug.current, e
                );
                None
            },
        }
    }

    /// Controller of the collection's page. A controller whose contract
    /// address no longer matches the collection is unmounted and replaced.
    pub async fn controller_for(&self, collection: &Collection) -> Arc<PageController> {
        let slug = &collection.slug.current;
        let mut sessions = self.sessions.lock().await;

        if let Some(session) = sessions.get(slug) {
            if session.address == collection.address && session.controller.is_mounted() {
                return session.controller.clone();
            }
            debug!("Replacing mint controller of {}", slug);
            session.controller.unmount();
        }

        let controller = Arc::new(MintFlowController::new(
            self.drop_contract(collection),
            self.wallet.clone(),
            self.notifier.clone(),
            self.metrics.clone(),
            self.shutdown_token.child_token(),
        ));
        sessions.insert(
            slug.clone(),
            Session {
                address: collection.address.clone(),
                controller: controller.clone(),
            },
        );
        controller
    }

    pub async fn get(&self, slug: &str) -> Option<Arc<PageController>> {
        self.sessions
            .lock()
            .await
            .get(slug)
            .map(|session| session.controller.clone())
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn unmount_all(&self) {
        for (_, session) in self.sessions.lock().await.drain() {
            session.controller.unmount();
        }
    }
}
