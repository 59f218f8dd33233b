// Signal handling module
//
// - SIGINT  (Ctrl+C): stop accepting connections
// - SIGTERM:          stop accepting connections
//
// Non-Unix platforms only get Ctrl+C.

use std::future::Future;

use crate::logger;

/// Resolve when the process is asked to stop, with the signal's name.
///
/// Handlers are installed when this is called, not on first poll, so a signal
/// that arrives before the accept loop starts is still caught. Must be called
/// inside the runtime.
#[cfg(unix)]
pub fn shutdown_signal() -> impl Future<Output = &'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let handlers = (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    );

    async move {
        let (mut sigint, mut sigterm) = match handlers {
            (Ok(int), Ok(term)) => (int, term),
            (Err(e), _) | (_, Err(e)) => {
                logger::log_error(&format!("Failed to register signal handlers: {e}"));
                return std::future::pending::<&'static str>().await;
            }
        };

        tokio::select! {
            _ = sigint.recv() => "SIGINT received",
            _ = sigterm.recv() => "SIGTERM received",
        }
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn shutdown_signal() -> impl Future<Output = &'static str> {
    async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
            return std::future::pending::<&'static str>().await;
        }
        "Ctrl+C received"
    }
}
