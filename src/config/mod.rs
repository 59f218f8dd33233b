// Configuration module entry point
// Layered settings (file, env, defaults), the serve root and shared runtime state

mod root;
mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, ListenConfig, LoggingConfig, PerformanceConfig, RootKind, ServerConfig};

/// Config file used when `PATHSERVE_CONFIG` is not set (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "pathserve";

/// Port served when nothing overrides it
pub const DEFAULT_PORT: u16 = 8000;

impl Config {
    /// Load configuration from `PATHSERVE_CONFIG` or `pathserve.toml`
    pub fn load() -> Result<Self, config::ConfigError> {
        let path =
            std::env::var("PATHSERVE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from the given file path (extension optional).
    /// A missing file is fine; environment variables and defaults still apply.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("PATHSERVE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", DEFAULT_PORT)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.header_read_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("definitely-not-a-config-file").unwrap();
        assert_eq!(cfg.server.port, DEFAULT_PORT);
        assert!(cfg.server.workers.is_none());
        assert!(cfg.performance.keep_alive);
        assert_eq!(cfg.logging.access_log_format, "common");
        assert!(cfg.logging.access_log_file.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("serve.toml");
        std::fs::write(
            &path,
            "[server]\nhost = \"127.0.0.1\"\nport = 9001\n\n[logging]\naccess_log = false\n",
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9001);
        assert!(!cfg.logging.access_log);
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:9001".parse::<SocketAddr>().unwrap()
        );
    }
}
