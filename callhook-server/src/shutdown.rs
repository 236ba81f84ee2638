//! Signal handling for graceful shutdown.

use std::future::pending;
use tokio::signal::unix::{SignalKind, signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Terminate,
    Interrupt,
}

/// Wait for one of `kind`. If the handler cannot be installed the error is
/// logged and this never resolves, leaving the other signal in charge.
async fn recv(kind: SignalKind, name: &'static str) {
    match signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::error!(signal = name, error = %e, "Failed to install signal handler");
            pending::<()>().await;
        }
    }
}

/// Resolves on SIGTERM or SIGINT (Ctrl+C).
pub async fn shutdown_signal() {
    let reason = tokio::select! {
        _ = recv(SignalKind::terminate(), "SIGTERM") => ShutdownReason::Terminate,
        _ = recv(SignalKind::interrupt(), "SIGINT") => ShutdownReason::Interrupt,
    };
    tracing::info!(?reason, "Shutdown signal received, draining in-flight webhooks");
}
