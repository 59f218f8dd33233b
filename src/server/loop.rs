// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::handle_connection;
use crate::config::{AppState, PerformanceConfig};
use crate::logger;

/// Run the accept loop.
///
/// Accept errors (fd exhaustion, aborted handshakes) are logged and the loop
/// keeps going. Returns once `shutdown` completes. Connections still in
/// flight are not drained: their tasks are cut off when the runtime shuts down.
pub async fn start_server_loop<S>(
    listener: TcpListener,
    state: Arc<AppState>,
    performance: PerformanceConfig,
    shutdown: S,
) where
    S: Future<Output = &'static str>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        handle_connection(stream, peer_addr, Arc::clone(&state), &performance);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            reason = &mut shutdown => {
                logger::log_shutdown(reason);
                break;
            }
        }
    }
}
