// Configuration types module
// Defines the listen, logging and performance settings plus the serve root

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure, loaded from file/env/defaults
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ListenConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Listener settings
#[derive(Debug, Deserialize, Clone)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// `common`, `combined`, `json` or a custom `$variable` pattern
    pub access_log_format: String,
    pub access_log_file: Option<String>,
    pub error_log_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds allowed for a client to send request headers
    pub header_read_timeout: u64,
}

/// What the root path turned out to be at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    File,
    Directory,
    /// Exists but is neither (fifo, socket, device)
    Other,
}

/// Immutable description of what is being served.
///
/// Built once by [`ServerConfig::probe`] and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub root_path: PathBuf,
    pub root_kind: RootKind,
    /// Canonical form of `root_path`, the containment boundary for directory mode
    pub canonical_root: PathBuf,
    pub port: u16,
}

impl ServerConfig {
    pub const fn root_is_directory(&self) -> bool {
        matches!(self.root_kind, RootKind::Directory)
    }
}
