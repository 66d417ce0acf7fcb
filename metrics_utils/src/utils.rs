use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::header::CONTENT_TYPE;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use prometheus_client::encoding::text::encode;
use prometheus_client::registry::Registry;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::errors::MetricsError;

const OPENMETRICS_CONTENT_TYPE: &str =
    "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// OpenMetrics text of `registry`. An encoding failure answers 500.
pub fn render_metrics(registry: &Registry) -> Response<Body> {
    let mut buf = String::new();
    if let Err(e) = encode(&mut buf, registry) {
        error!("{}", MetricsError::Encode(e.to_string()));
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        return response;
    }

    Response::builder()
        .header(CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)
        .body(Body::from(buf))
        .unwrap_or_default()
}

/// Answers every request on `addr` with the metrics until `shutdown_token`
/// is cancelled.
pub async fn serve_metrics(
    addr: SocketAddr,
    registry: Registry,
    shutdown_token: CancellationToken,
) -> Result<(), MetricsError> {
    let registry = Arc::new(registry);
    let make_service = make_service_fn(move |_conn| {
        let registry = registry.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |_req: Request<Body>| {
                let response = render_metrics(&registry);
                async move { Ok::<_, Infallible>(response) }
            }))
        }
    });

    info!("Metrics server listening on {}", addr);
    Server::try_bind(&addr)
        .map_err(|e| MetricsError::MetricsServer(e.to_string()))?
        .serve(make_service)
        .with_graceful_shutdown(shutdown_token.cancelled_owned())
        .await
        .map_err(|e| MetricsError::MetricsServer(e.to_string()))
}

/// Spawns the metrics server when a port is configured.
pub fn start_metrics(registry: Registry, port: Option<u16>, shutdown_token: CancellationToken) {
    let Some(port) = port else {
        warn!("Metrics port is missing, metrics are not exposed");
        return;
    };

    tokio::spawn(async move {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        match serve_metrics(addr, registry, shutdown_token).await {
            Ok(()) => info!("Metrics server stopped"),
            Err(e) => error!("Metrics server stopped with an error: {}", e),
        }
    });
}
