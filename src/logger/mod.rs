//! Logger module
//!
//! Operator-facing log lines for the server:
//! - Startup and shutdown messages (info, stdout)
//! - Per-request access lines in a configurable format
//! - Not-found warnings and permission/I/O errors (stderr)

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{Config, ServerConfig};
use std::net::SocketAddr;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_serve_attempt(root: &Path) {
    write_info(&format!("Attempting to serve: {}", root.display()));
}

pub fn log_server_start(addr: &SocketAddr, server: &ServerConfig, config: &Config) {
    let kind = if server.root_is_directory() {
        "directory"
    } else {
        "file"
    };
    write_info(&format!("HTTP server listening on http://localhost:{}/", server.port));
    write_info(&format!("Bound to: {addr}"));
    write_info(&format!("Serving {kind}: {}", server.root_path.display()));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
}

pub fn log_file_not_found(path: &Path) {
    log_warning(&format!("File not found: {}", path.display()));
}

pub fn log_permission_denied(path: &Path) {
    log_error(&format!("Permission denied to read: {}", path.display()));
}

pub fn log_serve_error(path: &Path, err: &std::io::Error) {
    log_error(&format!("Error serving file {}: {err}", path.display()));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_shutdown(reason: &str) {
    write_info(&format!("[SHUTDOWN] {reason}, no longer accepting connections"));
}
