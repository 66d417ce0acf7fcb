use tokio::signal;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Waits for Ctrl+C, or for another task to cancel `shutdown_token`, and
/// cancels the token. That stops the web server and the metrics server and
/// unmounts every mint controller.
pub async fn listen_shutdown(shutdown_token: CancellationToken) {
    tokio::select! {
        signal = signal::ctrl_c() => match signal {
            Ok(()) => {
                info!("Shutdown signal received");
            },
            Err(err) => {
                error!("Unable to listen for shutdown signal: {}", err);
            },
        },
        _ = shutdown_token.cancelled() => {
            info!("Shutdown requested");
        },
    }
    shutdown_token.cancel();
}

pub async fn graceful_stop(tasks: &mut JoinSet<()>) {
    while let Some(task) = tasks.join_next().await {
        match task {
            Ok(_) => {
                info!("One of the tasks was finished")
            },
            Err(err) if err.is_panic() => {
                let err = err.into_panic();
                error!("Task panic: {:?}", err);
            },
            Err(err) => {
                error!("Task error: {}", err);
            },
        }
    }
}
