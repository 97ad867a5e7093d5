//! Signal handling for graceful shutdown

use tracing::{info, warn};

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
pub async fn shutdown_signal() {
    use futures::stream::StreamExt;
    use signal_hook_tokio::Signals;

    let mut signals = match Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ]) {
        Ok(signals) => signals,
        Err(e) => {
            warn!("Failed to register signal handler, falling back to Ctrl-C: {}", e);
            ctrl_c().await;
            return;
        }
    };

    if let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
    }
}

/// Wait for Ctrl-C
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C"),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C: {}", e);
            futures::future::pending::<()>().await;
        }
    }
}
