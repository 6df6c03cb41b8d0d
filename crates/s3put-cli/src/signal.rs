//! Interrupt signal handling.

use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix;
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_SIGNAL;

/// Cancels `token` on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
///
/// Returns without cancelling if `token` is cancelled elsewhere first.
pub async fn cancel_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => {
                tracing::info!(target: TRACING_TARGET_SIGNAL, "Received Ctrl+C signal");
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_SIGNAL,
                    error = %e,
                    "Failed to install Ctrl+C handler"
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match unix::signal(unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                tracing::info!(target: TRACING_TARGET_SIGNAL, "Received SIGTERM signal");
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_SIGNAL,
                    error = %e,
                    "Failed to install SIGTERM handler"
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = token.cancelled() => return,
        () = ctrl_c => {},
        () = terminate => {},
    }

    token.cancel();
}
