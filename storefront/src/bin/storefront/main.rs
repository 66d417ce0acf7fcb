use std::sync::Arc;

use clap::Parser;
use metrics_utils::utils::start_metrics;
use metrics_utils::{MetricState, MetricsTrait};
use storefront::config::{
    init_logger, setup_config, HttpClientConfig, StorefrontClapArgs, STOREFRONT_CONFIG_PREFIX,
};
use storefront::error::StorefrontError;
use storefront::notifications::ToastCenter;
use storefront::sanity::{SanityClient, SanityImageUrlBuilder};
use storefront::thirdweb::wallet::BackendWallet;
use storefront::thirdweb::EngineClient;
use storefront::web::handlers::StorefrontHandler;
use storefront::web::service::start_web_server;
use storefront::web::sessions::MintSessions;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use usecase::graceful_stop::{graceful_stop, listen_shutdown};

#[tokio::main(flavor = "multi_thread")]
pub async fn main() -> Result<(), StorefrontError> {
    let args = StorefrontClapArgs::parse();
    init_logger(&args.log_level);

    info!("Starting storefront...");

    let http_config: HttpClientConfig = setup_config(STOREFRONT_CONFIG_PREFIX)?;
    let http_client = http_config.build_client()?;

    let mut metrics_state = MetricState::new();
    metrics_state.register_metrics();

    let shutdown_token = CancellationToken::new();

    let sanity_config = args.sanity_config();
    let content_store = Arc::new(SanityClient::new(
        &sanity_config,
        http_client.clone(),
        metrics_state.red_metrics.clone(),
    )?);
    let image_urls = Arc::new(SanityImageUrlBuilder::from_config(&sanity_config));

    let engine = EngineClient::new(
        args.engine_config()?,
        http_client,
        metrics_state.red_metrics.clone(),
    );
    let wallet = Arc::new(BackendWallet::new(engine.clone()));
    let notifications = Arc::new(ToastCenter::new());

    let sessions = MintSessions::new(
        Arc::new(engine),
        wallet.clone(),
        notifications.clone(),
        metrics_state.storefront_metrics.clone(),
        shutdown_token.clone(),
    );
    let handler = Arc::new(StorefrontHandler::new(
        content_store,
        image_urls,
        sessions,
        wallet,
        notifications,
        metrics_state.storefront_metrics.clone(),
    ));

    start_metrics(metrics_state.registry, args.metrics_port, shutdown_token.clone());

    let mut tasks = JoinSet::new();
    let cloned_token = shutdown_token.clone();
    let server_port = args.server_port;
    tasks.spawn(async move {
        if let Err(e) = start_web_server(handler, server_port, cloned_token.clone()).await {
            error!("Storefront server: {}", e);
            cloned_token.cancel();
        }
    });
    tasks.spawn(listen_shutdown(shutdown_token.clone()));

    graceful_stop(&mut tasks).await;

    Ok(())
}
