use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect};
use axum::Form;
use chrono::Utc;
use entities::models::Collection;
use interface::content_store::ContentStore;
use interface::image_urls::ImageUrlBuilder;
use interface::wallet::Wallet;
use metrics_utils::StorefrontMetricsConfig;
use serde::Deserialize;
use tracing::{error, info, warn};
use usecase::catalog::CatalogLoader;
use usecase::error::CatalogError;
use usecase::mint_flow::MintOutcome;

use crate::notifications::ToastCenter;
use crate::web::render;
use crate::web::sessions::{MintSessions, PageController};

const LIST_ROUTE: &str = "list";
const DETAIL_ROUTE: &str = "detail";
const MINT_ROUTE: &str = "mint";
const WALLET_ROUTE: &str = "wallet";

type Page = (StatusCode, Html<String>);

#[derive(Debug, Deserialize)]
pub struct WalletForm {
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Local absolute path, or `/` for anything that could leave the site.
pub fn safe_return_path(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.contains("://") =>
        {
            path
        },
        _ => "/",
    }
}

fn slug_of_path(path: &str) -> Option<&str> {
    path.strip_prefix("/nft/")
        .map(|rest| rest.trim_end_matches('/'))
        .filter(|slug| !slug.is_empty() && !slug.contains('/'))
}

pub struct StorefrontHandler {
    catalog: CatalogLoader<dyn ContentStore>,
    image_urls: Arc<dyn ImageUrlBuilder>,
    sessions: MintSessions,
    wallet: Arc<dyn Wallet>,
    notifications: Arc<ToastCenter>,
    metrics: Arc<StorefrontMetricsConfig>,
}

impl StorefrontHandler {
    pub fn new(
        content_store: Arc<dyn ContentStore>,
        image_urls: Arc<dyn ImageUrlBuilder>,
        sessions: MintSessions,
        wallet: Arc<dyn Wallet>,
        notifications: Arc<ToastCenter>,
        metrics: Arc<StorefrontMetricsConfig>,
    ) -> Self {
        Self {
            catalog: CatalogLoader::new(content_store),
            image_urls,
            sessions,
            wallet,
            notifications,
            metrics,
        }
    }

    pub fn sessions(&self) -> &MintSessions {
        &self.sessions
    }

    fn observe(&self, route: &str, start_time: chrono::DateTime<Utc>) {
        self.metrics.inc_page_requests(route);
        self.metrics.set_page_latency(
            route,
            Utc::now()
                .signed_duration_since(start_time)
                .num_milliseconds() as f64,
        );
    }

    fn catalog_error_page(&self, slug: Option<&str>, err: CatalogError) -> Page {
        match err {
            CatalogError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Html(render::not_found_page(slug.unwrap_or_default())),
            ),
            err => {
                error!("Cannot load catalog: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    Html(render::error_page("The collection catalog is unavailable.")),
                )
            },
        }
    }

    async fn render_detail(&self, collection: &Collection, controller: &PageController) -> Page {
        let view = controller.view().await;
        let toasts = self.notifications.active().await;
        (
            StatusCode::OK,
            Html(render::detail_page(
                collection,
                &view,
                self.image_urls.as_ref(),
                &toasts,
            )),
        )
    }

    pub async fn list_page(state: State<Arc<Self>>) -> impl IntoResponse {
        let start_time = Utc::now();
        let page = match state.catalog.load_collections().await {
            Ok(collections) => {
                let toasts = state.notifications.active().await;
                (
                    StatusCode::OK,
                    Html(render::listing_page(
                        &collections,
                        state.image_urls.as_ref(),
                        &toasts,
                    )),
                )
            },
            Err(e) => state.catalog_error_page(None, e),
        };
        state.observe(LIST_ROUTE, start_time);
        page
    }

    /// Loads the collection and mounts its mint controller, which reads the
    /// drop status before the page is rendered.
    pub async fn detail_page(state: State<Arc<Self>>, Path(slug): Path<String>) -> impl IntoResponse {
        let start_time = Utc::now();
        let page = match state.catalog.load_collection(&slug).await {
            Ok(collection) => {
                let controller = state.sessions.controller_for(&collection).await;
                controller.mount().await;
                state.render_detail(&collection, &controller).await
            },
            Err(e) => state.catalog_error_page(Some(&slug), e),
        };
        state.observe(DETAIL_ROUTE, start_time);
        page
    }

    pub async fn mint(state: State<Arc<Self>>, Path(slug): Path<String>) -> impl IntoResponse {
        let start_time = Utc::now();
        let page = match state.catalog.load_collection(&slug).await {
            Ok(collection) => {
                let controller = state.sessions.controller_for(&collection).await;
                if !controller.status().await.is_supply_known() {
                    controller.mount().await;
                }
                match controller.mint().await {
                    MintOutcome::Minted(receipt) => {
                        info!("Minted on {}: {:?}", slug, receipt.transaction_hash)
                    },
                    MintOutcome::Failed(kind) => warn!("Mint on {} failed: {}", slug, kind),
                    MintOutcome::Skipped(reason) => info!("Mint on {} skipped: {:?}", slug, reason),
                }
                state.render_detail(&collection, &controller).await
            },
            Err(e) => state.catalog_error_page(Some(&slug), e),
        };
        state.observe(MINT_ROUTE, start_time);
        page
    }

    pub async fn wallet_connect(state: State<Arc<Self>>, Form(form): Form<WalletForm>) -> impl IntoResponse {
        let start_time = Utc::now();
        let return_to = safe_return_path(form.return_to.as_deref());

        let controller = match slug_of_path(return_to) {
            Some(slug) => state.sessions.get(slug).await,
            None => None,
        };
        let connected = match controller {
            Some(controller) => controller.connect().await,
            None => state.wallet.connect().await,
        };
        match connected {
            Ok(address) => info!("Signed in with {}", address),
            Err(e) => warn!("Cannot connect wallet: {}", e),
        }

        state.observe(WALLET_ROUTE, start_time);
        Redirect::to(return_to)
    }

    pub async fn wallet_disconnect(state: State<Arc<Self>>, Form(form): Form<WalletForm>) -> impl IntoResponse {
        let start_time = Utc::now();
        let return_to = safe_return_path(form.return_to.as_deref());

        match slug_of_path(return_to) {
            Some(slug) => match state.sessions.get(slug).await {
                Some(controller) => controller.disconnect().await,
                None => state.wallet.disconnect().await,
            },
            None => state.wallet.disconnect().await,
        }

        state.observe(WALLET_ROUTE, start_time);
        Redirect::to(return_to)
    }
}

pub async fn health_check() -> &'static str {
    "Storefront is running"
}
