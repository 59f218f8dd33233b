// Application state module
// Read-only state shared by every connection task

use super::types::{Config, ServerConfig};

/// Application state
///
/// Built once in `main` and handed to connections behind an `Arc`. Nothing in
/// here changes after startup, so no locks are needed.
#[derive(Debug)]
pub struct AppState {
    pub server: ServerConfig,
    pub access_log: bool,
    pub access_log_format: String,
}

impl AppState {
    pub fn new(server: ServerConfig, config: &Config) -> Self {
        Self {
            server,
            access_log: config.logging.access_log,
            access_log_format: config.logging.access_log_format.clone(),
        }
    }

    /// State with access logging off, used where no config file is involved
    pub const fn quiet(server: ServerConfig) -> Self {
        Self {
            server,
            access_log: false,
            access_log_format: String::new(),
        }
    }
}
