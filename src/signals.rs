// src/signals.rs

//! Operator interrupt (Ctrl+C, and SIGTERM on Unix).

use tracing::error;

/// Resolves when the operator asks the process to stop.
///
/// If the signal handlers cannot be installed this never resolves; the run
/// still ends through its own conditions.
#[cfg(unix)]
pub async fn shutdown_requested() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to listen for SIGTERM: {e}");
            return ctrl_c().await;
        }
    };

    tokio::select! {
        _ = ctrl_c() => {}
        _ = term.recv() => {}
    }
}

#[cfg(not(unix))]
pub async fn shutdown_requested() {
    ctrl_c().await
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}
