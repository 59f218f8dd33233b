// Connection handling module
// Serves one accepted TCP connection on its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::config::{AppState, PerformanceConfig};
use crate::handler;
use crate::logger;

/// Handle a single connection in a spawned task.
///
/// Requests on the connection are served one after another by hyper's
/// HTTP/1.1 driver; separate connections run concurrently. When the client
/// goes away hyper drops the in-flight response body, closing any open file.
pub fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    performance: &PerformanceConfig,
) {
    let keep_alive = performance.keep_alive;
    let header_timeout = Duration::from_secs(performance.header_read_timeout);

    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(keep_alive);
        if !header_timeout.is_zero() {
            builder.timer(TokioTimer::new());
            builder.header_read_timeout(header_timeout);
        }

        let service = service_fn(move |req| {
            let state = Arc::clone(&state);
            async move { handler::handle_request(req, state, peer_addr).await }
        });

        if let Err(err) = builder.serve_connection(io, service).await {
            if !is_client_disconnect(&err) {
                logger::log_connection_error(&err);
            }
        }
    });
}

/// A client that hangs up mid-response is routine, not an error
fn is_client_disconnect(err: &hyper::Error) -> bool {
    if err.is_incomplete_message() || err.is_closed() || err.is_canceled() {
        return true;
    }

    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<std::io::Error>() {
            return matches!(
                io_err.kind(),
                std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
            );
        }
        source = cause.source();
    }
    false
}
