use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::StorefrontError;
use crate::web::handlers::{health_check, StorefrontHandler};

pub fn router(handler: Arc<StorefrontHandler>) -> Router {
    Router::new()
        .route("/", get(StorefrontHandler::list_page))
        .route("/nft/:id", get(StorefrontHandler::detail_page))
        .route("/nft/:id/mint", post(StorefrontHandler::mint))
        .route("/wallet/connect", post(StorefrontHandler::wallet_connect))
        .route("/wallet/disconnect", post(StorefrontHandler::wallet_disconnect))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(handler)
}

/// Serves the storefront until `shutdown_token` is cancelled, then unmounts
/// every mint controller.
pub async fn start_web_server(
    handler: Arc<StorefrontHandler>,
    port: u16,
    shutdown_token: CancellationToken,
) -> Result<(), StorefrontError> {
    let app = router(handler.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Storefront listening on {}", addr);

    let result = match axum::Server::try_bind(&addr) {
        Ok(server) => server
            .serve(app.into_make_service())
            .with_graceful_shutdown(shutdown_token.cancelled())
            .await
            .map_err(|e| StorefrontError::ServerError(e.to_string())),
        Err(e) => Err(StorefrontError::ServerError(e.to_string())),
    };

    handler.sessions().unmount_all().await;
    info!("Storefront stopped");
    result
}
